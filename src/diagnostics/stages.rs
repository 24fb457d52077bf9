//! Per-stage records captured by [`OmrDetector::recognize_with_diagnostics`](crate::OmrDetector).
use crate::binarize::{Binarized, Threshold};
use crate::normalize::SourceMapping;
use crate::notes::NoteHeadDetection;
use crate::staff::grouping::StaffCandidate;
use crate::staff::StaffDetection;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeStage {
    pub width: usize,
    pub height: usize,
    /// Map from processing pixels back to source pixels.
    pub mapping: SourceMapping,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinarizeStage {
    pub threshold: Threshold,
    pub ink_fraction: f32,
}

impl BinarizeStage {
    pub fn from_binarized(binarized: &Binarized) -> Self {
        Self {
            threshold: binarized.threshold,
            ink_fraction: binarized.ink_fraction(),
        }
    }
}

/// Staff detection signals in processing coordinates.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffStage {
    pub raw_peaks: Vec<f32>,
    pub merged_peaks: Vec<f32>,
    pub candidates: Vec<StaffCandidate>,
    pub accepted: usize,
}

impl StaffStage {
    pub fn from_detection(detection: &StaffDetection) -> Self {
        Self {
            raw_peaks: detection.raw_peaks.clone(),
            merged_peaks: detection.merged_peaks.clone(),
            candidates: detection.candidates.clone(),
            accepted: detection.staves.len(),
        }
    }
}

/// Note search on one staff.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStage {
    pub staff_index: usize,
    pub kernel_side: usize,
    pub kernel_area: f32,
    pub nms_half_window: usize,
    pub region_y0: usize,
    pub region_height: usize,
    pub candidates: usize,
    /// Notes whose staff position fell outside the staff and was clamped.
    pub clamped: usize,
}

impl NoteStage {
    pub fn from_detection(staff_index: usize, detection: &NoteHeadDetection, clamped: usize) -> Self {
        Self {
            staff_index,
            kernel_side: detection.kernel_side,
            kernel_area: detection.kernel_area,
            nms_half_window: detection.nms_half_window,
            region_y0: detection.region_y0,
            region_height: detection.region_height,
            candidates: detection.candidates.len(),
            clamped,
        }
    }
}
