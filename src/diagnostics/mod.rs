//! Diagnostics data model returned alongside the recognition result.
//!
//! `DetectionReport` bundles the [`OcrResult`](crate::types::OcrResult) with a
//! `PipelineTrace` describing what each stage saw: processing size, the
//! threshold and its origin, projection peaks and staff windows, per-staff
//! filter geometry, and stage timings.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{DetectionReport, InputDescriptor, PipelineTrace};
pub use stages::{BinarizeStage, NormalizeStage, NoteStage, StaffStage};
pub use timing::{StageTiming, TimingBreakdown};
