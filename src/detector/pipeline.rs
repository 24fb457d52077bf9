//! Detector pipeline driving recognition end-to-end.
//!
//! The [`OmrDetector`] exposes a small API: hand it a decoded page and get
//! the staves and pitched note heads found on it, optionally with a trace of
//! every stage.
//!
//! ```no_run
//! use staff_omr::{OmrDetector, OmrParams};
//!
//! # fn example(bytes: &[u8]) -> Result<(), staff_omr::OmrError> {
//! let detector = OmrDetector::new(OmrParams::default());
//! let result = detector.recognize_bytes(bytes)?;
//! for note in &result.detected_notes {
//!     println!("{} at ({:.0}, {:.0})", note.name(), note.position.x, note.position.y);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::OmrParams;
use crate::backend::ComputeBackend;
use crate::binarize::binarize;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{
    BinarizeStage, DetectionReport, InputDescriptor, NormalizeStage, NoteStage, PipelineTrace,
    StaffStage,
};
use crate::error::Result;
use crate::image::io::{decode_image, load_image};
use crate::image::{ImageF32, PixelBuffer};
use crate::normalize::{normalize, NormalizedImage, SourceMapping};
use crate::notes::detect_note_heads;
use crate::pitch::{map_pitch, raw_position, MAX_POSITION, MIN_POSITION};
use crate::staff::detect_staves_detailed;
use crate::types::{Clef, DetectedNote, DetectedStaff, OcrResult, Position};
use log::debug;
use std::path::Path;
use std::time::Instant;

/// Stateless page recognizer. Holds parameters and a handle to the numeric
/// backend; every call owns its buffers and releases them before returning.
pub struct OmrDetector<'b> {
    params: OmrParams,
    backend: &'b ComputeBackend,
}

impl OmrDetector<'static> {
    /// Detector running on the process-wide backend.
    pub fn new(params: OmrParams) -> Self {
        Self::with_backend(params, ComputeBackend::shared())
    }
}

impl<'b> OmrDetector<'b> {
    /// Detector running on an explicitly provided backend.
    pub fn with_backend(params: OmrParams, backend: &'b ComputeBackend) -> Self {
        Self { params, backend }
    }

    pub fn params(&self) -> &OmrParams {
        &self.params
    }

    pub fn set_clef(&mut self, clef: Clef) {
        self.params.clef = clef;
    }

    pub fn set_threshold(&mut self, threshold: Option<f32>) {
        self.params.threshold = threshold;
    }

    /// Decode `bytes` and recognize the page.
    pub fn recognize_bytes(&self, bytes: &[u8]) -> Result<OcrResult> {
        self.recognize(decode_image(bytes)?)
    }

    /// Load the image at `path` and recognize the page.
    pub fn recognize_path(&self, path: &Path) -> Result<OcrResult> {
        self.recognize(load_image(path)?)
    }

    /// Recognize a decoded page, returning only the result.
    pub fn recognize(&self, pixels: PixelBuffer) -> Result<OcrResult> {
        Ok(self.recognize_with_diagnostics(pixels)?.result)
    }

    /// Recognize a decoded page and return the result with a stage trace.
    pub fn recognize_with_diagnostics(&self, pixels: PixelBuffer) -> Result<DetectionReport> {
        let total_start = Instant::now();
        let mut trace = PipelineTrace::new(InputDescriptor {
            width: pixels.width(),
            height: pixels.height(),
            channels: pixels.channels(),
        });
        debug!(
            "OmrDetector::recognize start w={} h={} c={} clef={:?}",
            pixels.width(),
            pixels.height(),
            pixels.channels(),
            self.params.clef
        );

        let start = Instant::now();
        let NormalizedImage {
            image: gray,
            mapping,
        } = normalize(pixels, &self.params.normalize);
        trace.timings.record_since("normalize", start);
        trace.normalize = Some(NormalizeStage {
            width: gray.w,
            height: gray.h,
            mapping,
        });

        let start = Instant::now();
        let binarized = binarize(&gray, self.params.threshold)?;
        drop(gray);
        trace.timings.record_since("binarize", start);
        trace.binarize = Some(BinarizeStage::from_binarized(&binarized));
        debug!(
            "OmrDetector::recognize threshold={:.4} ({:?})",
            binarized.threshold.value, binarized.threshold.source
        );
        let binary = binarized.image;

        let start = Instant::now();
        let staff_detection = detect_staves_detailed(&binary, &self.params.staff);
        trace.timings.record_since("staff", start);
        trace.staff = Some(StaffStage::from_detection(&staff_detection));
        let staves = staff_detection.staves;
        if staves.is_empty() {
            debug!("OmrDetector::recognize no staff lines detected");
        }

        let start = Instant::now();
        let (notes, note_stages) = self.detect_notes(&binary, &staves, &mapping);
        drop(binary);
        trace.timings.record_since("notes", start);
        trace.notes = note_stages;

        let staves: Vec<DetectedStaff> = staves.iter().map(|s| s.mapped(&mapping)).collect();
        let result = OcrResult::assemble(staves, notes, Some(self.params.clef));
        trace.timings.total_ms = elapsed_ms(total_start);
        debug!(
            "OmrDetector::recognize done staves={} notes={} confidence={:.3} total_ms={:.3}",
            result.detected_staffs.len(),
            result.detected_notes.len(),
            result.confidence,
            trace.timings.total_ms
        );
        Ok(DetectionReport { result, trace })
    }

    /// Find and pitch note heads on the searched staves. Staff coordinates are
    /// in processing pixels; note positions are returned in source pixels.
    fn detect_notes(
        &self,
        binary: &ImageF32,
        staves: &[DetectedStaff],
        mapping: &SourceMapping,
    ) -> (Vec<DetectedNote>, Vec<NoteStage>) {
        let limit = self.params.notes.max_staves.unwrap_or(staves.len());
        let clef = self.params.clef;
        let mut notes = Vec::new();
        let mut stages = Vec::new();
        for (staff_index, staff) in staves.iter().enumerate().take(limit) {
            let detection = detect_note_heads(binary, staff, &self.params.notes, self.backend);
            let mut clamped = 0usize;
            for cand in &detection.candidates {
                let raw = raw_position(cand.y, staff);
                if !(MIN_POSITION..=MAX_POSITION).contains(&raw) {
                    clamped += 1;
                }
                let (pitch, octave) = map_pitch(cand.y, staff, clef);
                notes.push(DetectedNote {
                    pitch,
                    octave,
                    position: Position {
                        x: mapping.x(cand.x),
                        y: mapping.y(cand.y),
                    },
                    confidence: cand.confidence,
                    staff_index,
                });
            }
            stages.push(NoteStage::from_detection(staff_index, &detection, clamped));
        }
        if notes.is_empty() && !staves.is_empty() {
            debug!("OmrDetector::recognize no notes detected");
        }
        (notes, stages)
    }
}
