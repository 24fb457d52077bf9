#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod types;

// Stage modules – public for tools and tests.
pub mod backend;
pub mod binarize;
pub mod normalize;
pub mod notes;
pub mod pitch;
pub mod staff;

// Tooling helpers used by the binaries.
pub mod config;
pub mod overlay;

// --- High-level re-exports -------------------------------------------------

pub use crate::backend::ComputeBackend;
pub use crate::detector::{OmrDetector, OmrParams};
pub use crate::error::{OmrError, Result};
pub use crate::image::PixelBuffer;
pub use crate::types::{
    Clef, DetectedNote, DetectedStaff, OcrResult, Pitch, Position, StaffBounds,
};

pub use crate::diagnostics::{DetectionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use staff_omr::prelude::*;
///
/// # fn main() -> Result<(), OmrError> {
/// let (w, h) = (640usize, 480usize);
/// let page = PixelBuffer::from_raw(w, h, 1, vec![255u8; w * h])?;
///
/// let det = OmrDetector::new(OmrParams::default());
/// let result = det.recognize(page)?;
/// println!("staves={} notes={}", result.detected_staffs.len(), result.detected_notes.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{Clef, OcrResult, OmrDetector, OmrError, OmrParams, PixelBuffer};
}

// --- Stage-level API (for tools & advanced users) ---------------------------

pub mod stages {
    pub use crate::binarize::{binarize, otsu_threshold, Binarized, Threshold, ThresholdSource};
    pub use crate::normalize::{normalize, NormalizeOptions, NormalizedImage};
    pub use crate::notes::{detect_note_heads, NoteCandidate, NoteHeadDetection, NoteOptions};
    pub use crate::pitch::map_pitch;
    pub use crate::staff::{detect_staves, detect_staves_detailed, StaffDetection, StaffOptions};

    pub use crate::diagnostics::{
        BinarizeStage, InputDescriptor, NormalizeStage, NoteStage, StaffStage, StageTiming,
        TimingBreakdown,
    };
}
