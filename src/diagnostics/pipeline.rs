use crate::diagnostics::{BinarizeStage, NormalizeStage, NoteStage, StaffStage, TimingBreakdown};
use crate::types::OcrResult;
use serde::Serialize;

/// Result produced by [`OmrDetector::recognize_with_diagnostics`](crate::OmrDetector).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub result: OcrResult,
    pub trace: PipelineTrace,
}

/// End-to-end trace of one recognition call.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<NormalizeStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binarize: Option<BinarizeStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffStage>,
    pub notes: Vec<NoteStage>,
}

impl PipelineTrace {
    pub fn new(input: InputDescriptor) -> Self {
        Self {
            input,
            timings: TimingBreakdown::default(),
            normalize: None,
            binarize: None,
            staff: None,
            notes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}
