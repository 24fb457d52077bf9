//! I/O helpers: decoding source images, writing debug images and JSON.
//!
//! - `decode_image`: decode PNG/JPEG/etc. bytes into a [`PixelBuffer`].
//! - `load_image`: read and decode a file from disk.
//! - `save_rgb`: write an RGB image (used for debug overlays).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::PixelBuffer;
use crate::error::{OmrError, Result};
use image::RgbImage;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Decode an encoded image held in memory.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    if bytes.is_empty() {
        return Err(OmrError::ImageLoad("empty input".to_string()));
    }
    let img = image::load_from_memory(bytes)?;
    PixelBuffer::from_dynamic(img)
}

/// Read and decode an image file.
pub fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .map_err(|e| OmrError::ImageLoad(format!("failed to open {}: {e}", path.display())))?;
    PixelBuffer::from_dynamic(img)
}

/// Save an RGB image, creating parent directories. The format follows the
/// file extension.
pub fn save_rgb(image: &RgbImage, path: &Path) -> std::result::Result<(), String> {
    ensure_parent_dir(path)?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> std::result::Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> std::result::Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes() {
        let gray = GrayImage::from_pixel(4, 3, Luma([200]));
        let mut bytes = Vec::new();
        gray.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let buf = decode_image(&bytes).unwrap();
        assert_eq!((buf.width(), buf.height(), buf.channels()), (4, 3, 1));
        assert!(buf.as_raw().iter().all(|&v| v == 200));
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OmrError::ImageLoad(_)));
    }

    #[test]
    fn empty_bytes_fail_to_load() {
        assert!(matches!(decode_image(&[]), Err(OmrError::ImageLoad(_))));
    }

    #[test]
    fn saves_rgb_into_new_directory() {
        let dir = std::env::temp_dir().join(format!("staff_omr_io_{}", std::process::id()));
        let path = dir.join("nested").join("overlay.png");
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        save_rgb(&img, &path).unwrap();
        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back, img);
        let _ = fs::remove_dir_all(&dir);
    }
}
