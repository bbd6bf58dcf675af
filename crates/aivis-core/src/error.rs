//! Errors surfaced across the pipeline boundary.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Failure of a `process` or `analyze` request.
///
/// Per-zone failures never reach this type: they are logged and the zone is
/// skipped. Everything here aborts the whole request.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The uploaded bytes could not be decoded as an image.
    #[error("Invalid image format: {0}")]
    InvalidFormat(#[from] DecodeError),

    /// Detection found no faces, so there is nothing to transform.
    #[error("No faces detected in image")]
    NoFacesDetected,

    /// The requested mode is not one of the registered modes.
    #[error("Unknown processing mode: {0:?}")]
    UnknownMode(String),

    /// Something failed after decoding that is not the caller's fault.
    #[error("Internal processing error: {0}")]
    InternalProcessingError(String),
}

impl From<EncodeError> for ProcessError {
    fn from(err: EncodeError) -> Self {
        ProcessError::InternalProcessingError(err.to_string())
    }
}

impl ProcessError {
    /// Stable identifier for collaborators mapping errors to responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessError::InvalidFormat(_) => "invalid_format",
            ProcessError::NoFacesDetected => "no_faces_detected",
            ProcessError::UnknownMode(_) => "unknown_mode",
            ProcessError::InternalProcessingError(_) => "internal_processing_error",
        }
    }

    /// Whether the request itself was at fault (bad bytes, bad mode, no face).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ProcessError::InternalProcessingError(_))
    }
}
