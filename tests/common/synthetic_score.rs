use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

pub const PAPER: u8 = 255;
pub const INK: u8 = 0;

/// Blank grayscale page.
pub fn blank_page(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([PAPER]))
}

/// Draw five horizontal lines starting at `top`, `spacing` pixels apart,
/// each `thickness` rows thick, spanning `x0..x1`.
pub fn draw_staff(
    page: &mut GrayImage,
    top: u32,
    spacing: u32,
    thickness: u32,
    x0: u32,
    x1: u32,
) -> [u32; 5] {
    let mut lines = [0u32; 5];
    for (i, line) in lines.iter_mut().enumerate() {
        let y = top + i as u32 * spacing;
        *line = y;
        for dy in 0..thickness {
            for x in x0..x1.min(page.width()) {
                if y + dy < page.height() {
                    page.put_pixel(x, y + dy, Luma([INK]));
                }
            }
        }
    }
    lines
}

/// Fill a disk of `radius` centred at pixel `(cx, cy)`.
pub fn draw_disk(page: &mut GrayImage, cx: f32, cy: f32, radius: f32) {
    let (w, h) = page.dimensions();
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= radius * radius {
                page.put_pixel(x, y, Luma([INK]));
            }
        }
    }
}

/// Encode a page as PNG bytes.
pub fn encode_png(page: &GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    page.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding failed");
    bytes
}
