//! Grayscale conversion and width normalization.
//!
//! Collapses a [`PixelBuffer`] to luminance in `[0, 1]` and rescales the page
//! to `NormalizeOptions::target_width` (enlarging narrow pages, shrinking
//! wide ones, aspect ratio kept) so staff spacing lands in the range the
//! detectors are tuned for. `target_width: None` keeps the native resolution.
use crate::image::{ImageF32, ImageViewMut, PixelBuffer};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use log::debug;
use serde::{Deserialize, Serialize};

/// BT.601 luma weights.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// Processing width in pixels. `None` keeps the native resolution.
    pub target_width: Option<usize>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_width: Some(1200),
        }
    }
}

/// Per-axis map from processing pixels back to source pixels.
///
/// Coordinates are pixel indices (pixel `i` covers `[i, i + 1)`), so a
/// position maps as `(v + 0.5) * scale - 0.5` and a length as `v * scale`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapping {
    pub scale_x: f32,
    pub scale_y: f32,
}

impl SourceMapping {
    pub const IDENTITY: SourceMapping = SourceMapping {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Mapping from a `processing` sized image back to a `source` sized one.
    pub fn between(source: (usize, usize), processing: (usize, usize)) -> Self {
        let ratio = |src: usize, dst: usize| {
            if dst == 0 {
                1.0
            } else {
                src as f32 / dst as f32
            }
        };
        Self {
            scale_x: ratio(source.0, processing.0),
            scale_y: ratio(source.1, processing.1),
        }
    }

    pub fn x(&self, x: f32) -> f32 {
        (x + 0.5) * self.scale_x - 0.5
    }

    pub fn y(&self, y: f32) -> f32 {
        (y + 0.5) * self.scale_y - 0.5
    }

    pub fn width(&self, w: f32) -> f32 {
        w * self.scale_x
    }

    pub fn height(&self, h: f32) -> f32 {
        h * self.scale_y
    }
}

/// Grayscale page plus the mapping from processing pixels to source pixels.
#[derive(Clone, Debug)]
pub struct NormalizedImage {
    pub image: ImageF32,
    pub mapping: SourceMapping,
}

/// Convert to `[0, 1]` luminance and rescale. Consumes the source buffer.
pub fn normalize(pixels: PixelBuffer, options: &NormalizeOptions) -> NormalizedImage {
    let gray = to_luminance(&pixels);
    let source = (pixels.width(), pixels.height());
    drop(pixels);

    let target = match options.target_width {
        Some(t) if t > 0 && t != source.0 => t,
        _ => {
            return NormalizedImage {
                image: gray,
                mapping: SourceMapping::IDENTITY,
            }
        }
    };

    let ratio = target as f32 / source.0 as f32;
    let target_height = ((source.1 as f32 * ratio).round() as usize).max(1);
    debug!(
        "normalize resize {}x{} -> {}x{}",
        source.0, source.1, target, target_height
    );
    let resized = resize(&gray, target, target_height);
    drop(gray);
    NormalizedImage {
        mapping: SourceMapping::between(source, (resized.w, resized.h)),
        image: resized,
    }
}

/// Collapse interleaved channels to luminance in `[0, 1]`.
pub fn to_luminance(pixels: &PixelBuffer) -> ImageF32 {
    let channels = pixels.channels();
    let mut out = ImageF32::new(pixels.width(), pixels.height());
    for y in 0..pixels.height() {
        let src = pixels.row(y);
        let dst = out.row_mut(y);
        for (dst_px, px) in dst.iter_mut().zip(src.chunks_exact(channels)) {
            let luma = if channels >= 3 {
                LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32
            } else {
                px[0] as f32
            };
            *dst_px = (luma / 255.0).clamp(0.0, 1.0);
        }
    }
    out
}

fn resize(gray: &ImageF32, width: usize, height: usize) -> ImageF32 {
    let buffer = ImageBuffer::from_fn(gray.w as u32, gray.h as u32, |x, y| {
        Luma([gray.get(x as usize, y as usize)])
    });
    let resized = imageops::resize(&buffer, width as u32, height as u32, FilterType::Triangle);
    let (w, h) = (resized.width() as usize, resized.height() as usize);
    let mut data = resized.into_raw();
    for v in &mut data {
        *v = v.clamp(0.0, 1.0);
    }
    ImageF32 {
        w,
        h,
        stride: w,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_uses_bt601_weights() {
        let pixels = PixelBuffer::from_raw(2, 1, 3, vec![255, 0, 0, 0, 0, 255]).unwrap();
        let gray = to_luminance(&pixels);
        assert!((gray.get(0, 0) - LUMA_R).abs() < 1e-5);
        assert!((gray.get(1, 0) - LUMA_B).abs() < 1e-5);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let pixels = PixelBuffer::from_raw(1, 1, 4, vec![255, 255, 255, 0]).unwrap();
        let gray = to_luminance(&pixels);
        assert!((gray.get(0, 0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn narrow_images_are_enlarged_to_target_width() {
        let pixels = PixelBuffer::from_raw(40, 10, 1, vec![128; 400]).unwrap();
        let out = normalize(pixels, &NormalizeOptions::default());
        assert_eq!((out.image.w, out.image.h), (1200, 300));
        assert!((out.mapping.scale_x - 1.0 / 30.0).abs() < 1e-6);
        assert!((out.mapping.scale_y - 1.0 / 30.0).abs() < 1e-6);
        assert!(out
            .image
            .data
            .iter()
            .all(|&v| (v - 128.0 / 255.0).abs() < 1e-4));
    }

    #[test]
    fn native_resolution_is_opt_in() {
        let pixels = PixelBuffer::from_raw(40, 10, 1, vec![128; 400]).unwrap();
        let out = normalize(pixels, &NormalizeOptions { target_width: None });
        assert_eq!((out.image.w, out.image.h), (40, 10));
        assert_eq!(out.mapping, SourceMapping::IDENTITY);
    }

    #[test]
    fn matching_width_is_left_untouched() {
        let pixels = PixelBuffer::from_raw(1200, 3, 1, vec![7; 3600]).unwrap();
        let out = normalize(pixels, &NormalizeOptions::default());
        assert_eq!((out.image.w, out.image.h), (1200, 3));
        assert_eq!(out.mapping, SourceMapping::IDENTITY);
    }

    #[test]
    fn wide_images_are_downscaled_to_target_width() {
        let pixels = PixelBuffer::from_raw(400, 100, 1, vec![255; 40_000]).unwrap();
        let options = NormalizeOptions {
            target_width: Some(200),
        };
        let out = normalize(pixels, &options);
        assert_eq!((out.image.w, out.image.h), (200, 50));
        assert!((out.mapping.scale_x - 2.0).abs() < 1e-6);
        assert!(out.image.data.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn axes_use_their_own_scale() {
        // 300x101 -> 200x67: the rounded height makes the axes differ.
        let pixels = PixelBuffer::from_raw(300, 101, 1, vec![255; 300 * 101]).unwrap();
        let out = normalize(
            pixels,
            &NormalizeOptions {
                target_width: Some(200),
            },
        );
        assert_eq!((out.image.w, out.image.h), (200, 67));
        assert!((out.mapping.scale_x - 1.5).abs() < 1e-6);
        assert!((out.mapping.scale_y - 101.0 / 67.0).abs() < 1e-6);
    }

    #[test]
    fn mapping_aligns_pixel_centres() {
        let map = SourceMapping {
            scale_x: 2.0,
            scale_y: 0.5,
        };
        // Processing pixel 60 covers source pixels 120 and 121.
        assert_eq!(map.x(60.0), 120.5);
        // Processing pixels 0 and 1 both lie inside source pixel 0.
        assert_eq!(map.y(0.0), -0.25);
        assert_eq!(map.y(1.0), 0.25);
        assert_eq!(map.width(10.0), 20.0);
        assert_eq!(map.height(10.0), 5.0);
        assert_eq!(SourceMapping::IDENTITY.x(37.0), 37.0);
    }

    #[test]
    fn mapping_between_sizes() {
        let map = SourceMapping::between((2400, 600), (1200, 300));
        assert_eq!(map.scale_x, 2.0);
        assert_eq!(map.scale_y, 2.0);
    }
}
