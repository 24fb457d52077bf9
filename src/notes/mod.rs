//! Note head detection around a single staff.
//!
//! A filled note head is roughly a disk one staff space across, so a disk
//! kernel sized from the spacing works as a matched filter:
//!
//! 1. crop the binary page to the staff padded by `pad_spacings × spacing`
//!    above and below;
//! 2. invert it so ink carries the signal;
//! 3. convolve with [`CircularKernel`] (same size, zero padded);
//! 4. keep responses above `min_response_ratio × area` that are window maxima
//!    (see [`nms`]);
//! 5. score each survivor with `min(response / area, 1)`.
//!
//! Reported positions are the peak location shifted to the geometric kernel
//! centre, which sits half a pixel off the anchor for even kernel sides.
//!
//! Candidates carry page coordinates and are sorted left to right.

pub mod kernel;
pub mod nms;

#[cfg(test)]
mod tests;

use crate::backend::ComputeBackend;
use crate::image::ImageF32;
use crate::types::DetectedStaff;
pub use kernel::CircularKernel;
use log::debug;
use nms::local_maxima;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoteOptions {
    /// Rows added above the top and below the bottom line, in spacings.
    pub pad_spacings: f32,
    /// Kernel side length in spacings.
    pub kernel_size_factor: f32,
    /// Disk radius is `side / kernel_radius_divisor`.
    pub kernel_radius_divisor: f32,
    /// Minimum response as a fraction of the kernel area.
    pub min_response_ratio: f32,
    /// NMS half-window in spacings.
    pub nms_spacing_factor: f32,
    /// Number of staves (from the top) searched for notes. `None` searches all.
    pub max_staves: Option<usize>,
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self {
            pad_spacings: 3.0,
            kernel_size_factor: 1.2,
            kernel_radius_divisor: 2.5,
            min_response_ratio: 0.3,
            nms_spacing_factor: 0.8,
            max_staves: Some(1),
        }
    }
}

/// Note head position before pitch assignment, in page pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoteCandidate {
    pub x: f32,
    pub y: f32,
    pub response: f32,
    pub confidence: f32,
}

/// Candidates for one staff plus the filter geometry used to find them.
#[derive(Clone, Debug)]
pub struct NoteHeadDetection {
    pub candidates: Vec<NoteCandidate>,
    pub kernel_side: usize,
    pub kernel_area: f32,
    pub nms_half_window: usize,
    /// First page row of the searched region.
    pub region_y0: usize,
    pub region_height: usize,
}

pub fn detect_note_heads(
    binary: &ImageF32,
    staff: &DetectedStaff,
    options: &NoteOptions,
    backend: &ComputeBackend,
) -> NoteHeadDetection {
    let kernel = CircularKernel::for_spacing(
        staff.spacing,
        options.kernel_size_factor,
        options.kernel_radius_divisor,
    );
    let area = kernel.area();
    let half_window = (options.nms_spacing_factor * staff.spacing).round().max(0.0) as usize;

    let pad = options.pad_spacings * staff.spacing;
    let y0 = (staff.top() - pad).floor().max(0.0) as usize;
    let y1 = ((staff.bottom() + pad).ceil().max(0.0) as usize + 1).min(binary.h);

    let mut detection = NoteHeadDetection {
        candidates: Vec::new(),
        kernel_side: kernel.side(),
        kernel_area: area,
        nms_half_window: half_window,
        region_y0: y0,
        region_height: y1.saturating_sub(y0),
    };
    if y0 >= y1 || binary.w == 0 || area <= 0.0 {
        return detection;
    }

    let region = binary.crop_rows(y0, y1).inverted();
    let response = kernel.convolve(&region, backend);
    drop(region);

    let peaks = local_maxima(&response, options.min_response_ratio * area, half_window);
    drop(response);

    let offset = kernel.centre_offset();
    let mut candidates: Vec<NoteCandidate> = peaks
        .into_iter()
        .map(|p| NoteCandidate {
            x: p.x as f32 + offset,
            y: (p.y + y0) as f32 + offset,
            response: p.response,
            confidence: (p.response / area).min(1.0),
        })
        .collect();
    candidates.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    debug!(
        "detect_note_heads rows={}..{} kernel={} area={} nms={} candidates={}",
        y0,
        y1,
        kernel.side(),
        area,
        half_window,
        candidates.len()
    );
    detection.candidates = candidates;
    detection
}
