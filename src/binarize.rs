//! Global thresholding into a two-level image.
//!
//! The threshold is either supplied by the caller or chosen with Otsu's
//! method over a 256-bin histogram. Pixels strictly above the threshold
//! become paper (`1.0`), everything else becomes ink (`0.0`).
use crate::error::{OmrError, Result};
use crate::image::ImageF32;
use serde::{Deserialize, Serialize};

const NUM_BINS: usize = 256;

/// Where the threshold used for a page came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ThresholdSource {
    Otsu,
    Override,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    /// Intensity cut in `[0, 1]`.
    pub value: f32,
    pub source: ThresholdSource,
}

#[derive(Clone, Debug)]
pub struct Binarized {
    pub image: ImageF32,
    pub threshold: Threshold,
}

impl Binarized {
    /// Fraction of pixels classified as ink.
    pub fn ink_fraction(&self) -> f32 {
        let area = self.image.area();
        if area == 0 {
            return 0.0;
        }
        let ink = self.image.data.iter().filter(|&&v| v <= 0.0).count();
        ink as f32 / area as f32
    }
}

#[inline]
fn quantize(v: f32) -> usize {
    ((v.clamp(0.0, 1.0) * (NUM_BINS - 1) as f32).round() as usize).min(NUM_BINS - 1)
}

/// Otsu threshold over `[0, 1]` samples, returned as a histogram bin index.
///
/// The background class holds bins `<= t`. Ties resolve to the lowest `t`;
/// a single-intensity image yields `t = 0`.
pub fn otsu_bin(data: &[f32]) -> usize {
    let mut histogram = [0u64; NUM_BINS];
    for &v in data {
        histogram[quantize(v)] += 1;
    }

    let total = data.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut cum_count = 0.0f64;
    let mut cum_sum = 0.0f64;
    let mut best_variance = 0.0f64;
    let mut best_t = 0usize;
    for (t, &count) in histogram.iter().enumerate() {
        cum_count += count as f64;
        cum_sum += t as f64 * count as f64;
        let fg_count = total - cum_count;
        if cum_count == 0.0 || fg_count == 0.0 {
            continue;
        }
        let w_b = cum_count / total;
        let w_f = fg_count / total;
        let m_b = cum_sum / cum_count;
        let m_f = (total_sum - cum_sum) / fg_count;
        let diff = m_b - m_f;
        let variance = w_b * w_f * diff * diff;
        if variance > best_variance {
            best_variance = variance;
            best_t = t;
        }
    }
    best_t
}

/// Otsu threshold expressed in the `[0, 1]` intensity domain.
///
/// The cut sits half a bin above bin `t`, so exactly the samples that were
/// histogrammed into bins `<= t` compare as ink.
pub fn otsu_threshold(image: &ImageF32) -> Result<f32> {
    if image.area() == 0 || image.data.len() != image.area() {
        return Err(OmrError::invalid("cannot threshold an empty buffer"));
    }
    Ok((otsu_bin(&image.data) as f32 + 0.5) / (NUM_BINS - 1) as f32)
}

/// Apply a fixed threshold: `v > threshold` → `1.0`, otherwise `0.0`.
pub fn apply_threshold(image: &ImageF32, threshold: f32) -> ImageF32 {
    ImageF32 {
        w: image.w,
        h: image.h,
        stride: image.stride,
        data: image
            .data
            .iter()
            .map(|&v| if v > threshold { 1.0 } else { 0.0 })
            .collect(),
    }
}

/// Threshold `gray`, using `override_threshold` when given and Otsu otherwise.
pub fn binarize(gray: &ImageF32, override_threshold: Option<f32>) -> Result<Binarized> {
    if gray.area() == 0 {
        return Err(OmrError::invalid("cannot binarize a zero-area image"));
    }
    let threshold = match override_threshold {
        Some(value) if value.is_finite() => Threshold {
            value,
            source: ThresholdSource::Override,
        },
        Some(value) => {
            return Err(OmrError::invalid(format!(
                "threshold override must be finite, got {value}"
            )))
        }
        None => Threshold {
            value: otsu_threshold(gray)?,
            source: ThresholdSource::Otsu,
        },
    };
    Ok(Binarized {
        image: apply_threshold(gray, threshold.value),
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone(w: usize, h: usize, dark: f32, light: f32) -> ImageF32 {
        let mut img = ImageF32::filled(w, h, light);
        for y in 0..h {
            for x in 0..w / 3 {
                img.set(x, y, dark);
            }
        }
        img
    }

    #[test]
    fn otsu_separates_two_levels() {
        let img = two_tone(30, 10, 0.1, 0.9);
        let t = otsu_threshold(&img).unwrap();
        assert!(t >= 0.1 && t < 0.9, "threshold {t} outside the two levels");
        let out = binarize(&img, None).unwrap();
        assert_eq!(out.image.get(0, 0), 0.0);
        assert_eq!(out.image.get(29, 9), 1.0);
        assert!((out.ink_fraction() - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn tied_variance_resolves_to_lowest_bin() {
        // Two levels in bins 50 and 200 with nothing between them: every cut
        // in 50..200 splits the same classes with the same variance.
        let mut data = vec![50.0 / 255.0; 40];
        data.extend(std::iter::repeat(200.0 / 255.0).take(60));
        assert_eq!(otsu_bin(&data), 50);
        let img = ImageF32::from_vec(10, 10, data).unwrap();
        let t = otsu_threshold(&img).unwrap();
        assert!((t - 50.5 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_image_thresholds_at_zero() {
        let img = ImageF32::filled(8, 8, 0.6);
        assert_eq!(otsu_bin(&img.data), 0);
        let out = binarize(&img, None).unwrap();
        assert!(out.image.data.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn partition_is_invariant_to_intensity_scaling() {
        let img = two_tone(30, 10, 0.2, 0.8);
        let mut scaled = img.clone();
        for v in &mut scaled.data {
            *v *= 0.5;
        }
        let a = binarize(&img, None).unwrap();
        let b = binarize(&scaled, None).unwrap();
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn rebinarizing_is_idempotent() {
        let mut img = two_tone(30, 10, 0.25, 0.75);
        img.set(20, 5, 0.5);
        let first = binarize(&img, None).unwrap();
        let again = apply_threshold(&first.image, first.threshold.value);
        assert_eq!(first.image, again);
    }

    #[test]
    fn override_is_used_verbatim() {
        let img = two_tone(30, 10, 0.3, 0.6);
        let out = binarize(&img, Some(0.7)).unwrap();
        assert_eq!(out.threshold.source, ThresholdSource::Override);
        assert!(out.image.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn non_finite_override_is_rejected() {
        let img = ImageF32::filled(2, 2, 0.5);
        assert!(matches!(
            binarize(&img, Some(f32::NAN)),
            Err(OmrError::InvalidImage { .. })
        ));
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let img = ImageF32::new(0, 5);
        assert!(matches!(
            binarize(&img, None),
            Err(OmrError::InvalidImage { .. })
        ));
    }
}
