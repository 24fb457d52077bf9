//! Staff line detection from a binary page.
//!
//! Overview
//! - Count ink pixels per row (horizontal projection).
//! - Keep rows that are strict local maxima above `peak_ratio × width`
//!   (optionally also flat-topped runs, see `StaffOptions::plateau_peaks`).
//! - Merge peaks closer than `merge_dist_px` (thick or anti-aliased lines
//!   produce clusters of peaks).
//! - Slide a five-peak window over the merged list, keeping windows with
//!   regular spacing inside `(min_spacing_px, max_spacing_px)`.
//! - Accept windows greedily by ascending spacing variance so that a stray
//!   line shared by two windows ends up in the tighter one.
//!
//! An empty result means no notation was found; it is not an error.

pub mod grouping;
pub mod projection;


use crate::image::{ImageF32, ImageView};
use crate::types::{DetectedStaff, StaffBounds};
use grouping::{candidate_windows, select_staves, StaffCandidate};
use log::debug;
use projection::{find_peaks, horizontal_projection, merge_peaks};
use serde::{Deserialize, Serialize};

/// Knobs for staff line detection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaffOptions {
    /// Minimum ink count of a line row as a fraction of the image width.
    pub peak_ratio: f32,
    /// Peaks at most this far apart (pixels) are merged.
    pub merge_dist_px: f32,
    /// Maximum relative deviation of a spacing from the window mean.
    pub spacing_tolerance: f32,
    /// Exclusive lower bound on the mean line spacing (pixels).
    pub min_spacing_px: f32,
    /// Exclusive upper bound on the mean line spacing (pixels).
    pub max_spacing_px: f32,
    /// Also accept flat-topped runs of equal counts as peaks (thick lines).
    pub plateau_peaks: bool,
}

impl Default for StaffOptions {
    fn default() -> Self {
        Self {
            peak_ratio: 0.15,
            merge_dist_px: 3.0,
            spacing_tolerance: 0.3,
            min_spacing_px: 5.0,
            max_spacing_px: 50.0,
            plateau_peaks: false,
        }
    }
}

/// Staves plus the intermediate signals that produced them.
#[derive(Clone, Debug)]
pub struct StaffDetection {
    pub staves: Vec<DetectedStaff>,
    pub raw_peaks: Vec<f32>,
    pub merged_peaks: Vec<f32>,
    pub candidates: Vec<StaffCandidate>,
}

/// Detect staves, sorted top to bottom.
pub fn detect_staves(binary: &ImageF32, options: &StaffOptions) -> Vec<DetectedStaff> {
    detect_staves_detailed(binary, options).staves
}

pub fn detect_staves_detailed(binary: &ImageF32, options: &StaffOptions) -> StaffDetection {
    let projection = horizontal_projection(binary);
    let min_count = options.peak_ratio * binary.w as f32;
    let raw_peaks = find_peaks(&projection, min_count, options.plateau_peaks);
    let merged_peaks = merge_peaks(&raw_peaks, options.merge_dist_px);
    let candidates = candidate_windows(
        &merged_peaks,
        options.spacing_tolerance,
        options.min_spacing_px,
        options.max_spacing_px,
    );
    let accepted = select_staves(candidates.clone());
    debug!(
        "detect_staves peaks={} merged={} candidates={} accepted={}",
        raw_peaks.len(),
        merged_peaks.len(),
        candidates.len(),
        accepted.len()
    );

    let staves = accepted
        .iter()
        .map(|cand| DetectedStaff {
            lines: cand.lines,
            spacing: cand.spacing,
            bounds: staff_bounds(binary, &cand.lines),
        })
        .collect();

    StaffDetection {
        staves,
        raw_peaks,
        merged_peaks,
        candidates,
    }
}

/// Horizontal ink extent over the five line rows; full width when the rows
/// carry no ink (e.g. after aggressive merging).
fn staff_bounds(binary: &ImageF32, lines: &[f32; 5]) -> StaffBounds {
    let mut x_min = usize::MAX;
    let mut x_max = 0usize;
    for &ly in lines {
        let y = (ly.round() as usize).min(binary.h.saturating_sub(1));
        if binary.h == 0 {
            break;
        }
        let row = binary.row(y);
        if let Some(first) = row.iter().position(|&v| v <= 0.0) {
            x_min = x_min.min(first);
        }
        if let Some(last) = row.iter().rposition(|&v| v <= 0.0) {
            x_max = x_max.max(last);
        }
    }
    let (x, width) = if x_min == usize::MAX {
        (0.0, binary.w as f32)
    } else {
        (x_min as f32, (x_max - x_min + 1) as f32)
    };
    StaffBounds {
        x,
        y: lines[0],
        width,
        height: lines[4] - lines[0],
    }
}
