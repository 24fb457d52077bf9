//! Error taxonomy for the recognition pipeline.
//!
//! Only malformed input is an error. A page without staff lines or without
//! note heads yields an empty [`OcrResult`](crate::types::OcrResult).
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OmrError {
    /// The input could not be decoded into a pixel buffer.
    #[error("failed to load image: {0}")]
    ImageLoad(String),

    /// The decoded buffer has zero area or an inconsistent layout.
    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },
}

impl OmrError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        OmrError::InvalidImage {
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for OmrError {
    fn from(err: image::ImageError) -> Self {
        OmrError::ImageLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OmrError>;
