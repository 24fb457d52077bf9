//! Recognition entry point.
//!
//! Overview
//! - Normalize: collapse the decoded page to `[0, 1]` luminance and cap its
//!   width.
//! - Binarize: Otsu (or a fixed override) into paper/ink.
//! - Staff: five-line groups from the row projection.
//! - Notes: disk matched filter + NMS around each searched staff, then pitch
//!   mapping through the configured clef.
//! - Assemble: map coordinates back to source pixels and average confidences.
//!
//! Modules
//! - [`params`] – configuration types used by the detector and binaries.
//! - `pipeline` – the [`OmrDetector`] implementation.

pub mod params;
mod pipeline;

pub use params::OmrParams;
pub use pipeline::OmrDetector;
