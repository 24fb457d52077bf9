//! Dense 8-bit pixel buffer produced by the image loader.
//!
//! Samples are interleaved (`height × width × channels`, row-major). The
//! buffer is handed by value to the normalizer, which consumes it.
use crate::error::{OmrError, Result};
use image::DynamicImage;

/// Decoded raster image with 1 (L), 2 (LA), 3 (RGB) or 4 (RGBA) channels.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved samples, validating the layout.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(OmrError::invalid(format!(
                "zero-area image ({width}x{height})"
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(OmrError::invalid(format!(
                "unsupported channel count {channels}"
            )));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(OmrError::invalid(format!(
                "sample count {} does not match {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Convert a decoded image, keeping grayscale inputs single-channel.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let (channels, data) = match img {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            other if other.color().has_alpha() => (4, other.into_rgba8().into_raw()),
            other if other.color().channel_count() == 1 => (1, other.into_luma8().into_raw()),
            other => (3, other.into_rgb8().into_raw()),
        };
        Self::from_raw(width, height, channels, data)
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Interleaved samples per pixel
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples of row `y`, `width × channels` long.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let len = self.width * self.channels;
        let start = y * len;
        &self.data[start..start + len]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_area() {
        let err = PixelBuffer::from_raw(0, 4, 1, Vec::new()).unwrap_err();
        assert!(matches!(err, OmrError::InvalidImage { .. }));
    }

    #[test]
    fn rejects_inconsistent_sample_count() {
        let err = PixelBuffer::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, OmrError::InvalidImage { .. }));
    }

    #[test]
    fn rejects_unknown_channel_layout() {
        let err = PixelBuffer::from_raw(1, 1, 5, vec![0; 5]).unwrap_err();
        assert!(matches!(err, OmrError::InvalidImage { .. }));
    }

    #[test]
    fn keeps_rgb_layout_from_dynamic_image() {
        let rgb = image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]));
        let buf = PixelBuffer::from_dynamic(DynamicImage::ImageRgb8(rgb)).unwrap();
        assert_eq!((buf.width(), buf.height(), buf.channels()), (3, 2, 3));
        assert_eq!(&buf.row(1)[..3], &[10, 20, 30]);
    }
}
