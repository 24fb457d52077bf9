//! Debug rendering of a recognition result on top of the source page.
//!
//! Staff boxes are drawn in blue, staff lines in cyan, and each note as a
//! ring coloured by confidence: green at `>= 0.7`, yellow at `>= 0.4`, red
//! below.
use crate::types::{DetectedStaff, OcrResult};
use image::{Rgb, RgbImage};

const COLOR_BOX: Rgb<u8> = Rgb([40, 90, 230]);
const COLOR_LINE: Rgb<u8> = Rgb([0, 200, 220]);
const COLOR_HIGH: Rgb<u8> = Rgb([30, 190, 60]);
const COLOR_MEDIUM: Rgb<u8> = Rgb([235, 200, 20]);
const COLOR_LOW: Rgb<u8> = Rgb([220, 40, 40]);

/// Colour used for a note of the given confidence.
pub fn confidence_color(confidence: f32) -> Rgb<u8> {
    if confidence >= 0.7 {
        COLOR_HIGH
    } else if confidence >= 0.4 {
        COLOR_MEDIUM
    } else {
        COLOR_LOW
    }
}

/// Copy `page` and draw `result` on it. Coordinates are source pixels.
pub fn render_overlay(page: &RgbImage, result: &OcrResult) -> RgbImage {
    let mut canvas = page.clone();
    for staff in &result.detected_staffs {
        draw_staff(&mut canvas, staff);
    }
    let radius_for = |staff_index: usize| {
        result
            .detected_staffs
            .get(staff_index)
            .map(|s| s.spacing * 0.6)
            .unwrap_or(4.0)
    };
    for note in &result.detected_notes {
        draw_ring(
            &mut canvas,
            (note.position.x, note.position.y),
            radius_for(note.staff_index),
            confidence_color(note.confidence),
        );
    }
    canvas
}

fn draw_staff(canvas: &mut RgbImage, staff: &DetectedStaff) {
    let b = staff.bounds;
    let x0 = b.x.round() as i32;
    let x1 = (b.x + b.width).round() as i32 - 1;
    for &y in &staff.lines {
        draw_hline(canvas, x0, x1, y.round() as i32, COLOR_LINE);
    }
    let y0 = b.y.round() as i32;
    let y1 = (b.y + b.height).round() as i32 - 1;
    draw_hline(canvas, x0, x1, y0, COLOR_BOX);
    draw_hline(canvas, x0, x1, y1, COLOR_BOX);
    draw_vline(canvas, x0, y0, y1, COLOR_BOX);
    draw_vline(canvas, x1, y0, y1, COLOR_BOX);
}

fn put(canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_hline(canvas: &mut RgbImage, x0: i32, x1: i32, y: i32, color: Rgb<u8>) {
    for x in x0..=x1 {
        put(canvas, x, y, color);
    }
}

fn draw_vline(canvas: &mut RgbImage, x: i32, y0: i32, y1: i32, color: Rgb<u8>) {
    for y in y0..=y1 {
        put(canvas, x, y, color);
    }
}

/// One-pixel-thick ring around `center`.
fn draw_ring(canvas: &mut RgbImage, center: (f32, f32), radius: f32, color: Rgb<u8>) {
    let cx = center.0.round() as i32;
    let cy = center.1.round() as i32;
    let radius = radius.max(2.0);
    let r_outer = radius.ceil() as i32;
    let inner = (radius - 1.0).max(0.0);
    let inner_sq = inner * inner;
    let outer_sq = radius * radius;
    for y in (cy - r_outer)..=(cy + r_outer) {
        for x in (cx - r_outer)..=(cx + r_outer) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d2 = dx * dx + dy * dy;
            if d2 >= inner_sq && d2 <= outer_sq {
                put(canvas, x, y, color);
            }
        }
    }
}
