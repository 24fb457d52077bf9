//! Parameter types configuring the recognition stages.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON config only
//! needs to name the knobs it changes.

use crate::normalize::NormalizeOptions;
use crate::notes::NoteOptions;
use crate::staff::StaffOptions;
use crate::types::Clef;
use serde::{Deserialize, Serialize};

/// Detector-wide parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OmrParams {
    /// Width normalization applied before thresholding.
    pub normalize: NormalizeOptions,
    /// Fixed binarization threshold in `[0, 1]`; Otsu's method when `None`.
    pub threshold: Option<f32>,
    /// Clef used for pitch mapping.
    pub clef: Clef,
    pub staff: StaffOptions,
    pub notes: NoteOptions,
}
