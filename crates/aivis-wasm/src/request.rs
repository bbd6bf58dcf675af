//! Upload validation and error-to-status mapping.
//!
//! Nothing in here touches JavaScript types, so it is tested natively.

use aivis_core::{ConfigError, ProcessError};
use serde::Serialize;
use thiserror::Error;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Mode used when the caller does not name one.
pub const DEFAULT_MODE: &str = "genai_safe";

/// Rejections that happen before the pipeline runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unsupported format {0:?}. Allowed: image/jpeg, image/jpg, image/png")]
    UnsupportedContentType(String),

    #[error("File too large. Max size: 10MB")]
    TooLarge { size: usize },

    #[error("Empty upload")]
    Empty,
}

/// Check size and (when given) MIME type of an upload.
pub fn validate_upload(len: usize, content_type: Option<&str>) -> Result<(), RequestError> {
    if let Some(content_type) = content_type {
        let normalized = content_type.trim().to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&normalized.as_str()) {
            return Err(RequestError::UnsupportedContentType(content_type.to_string()));
        }
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(RequestError::TooLarge { size: len });
    }
    if len == 0 {
        return Err(RequestError::Empty);
    }
    Ok(())
}

/// The fields of the error object thrown to JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
    /// HTTP-style status a host server can forward unchanged.
    pub status: u16,
}

impl ErrorResponse {
    /// A caller-supplied options object (config, preset faces) did not parse.
    pub fn unparseable(what: &str, detail: impl std::fmt::Display) -> Self {
        ErrorResponse {
            kind: "invalid_config",
            message: format!("Invalid {}: {}", what, detail),
            status: 400,
        }
    }
}

impl From<&RequestError> for ErrorResponse {
    fn from(err: &RequestError) -> Self {
        let (kind, status) = match err {
            RequestError::UnsupportedContentType(_) => ("unsupported_format", 400),
            RequestError::TooLarge { .. } => ("file_too_large", 413),
            RequestError::Empty => ("invalid_format", 400),
        };
        ErrorResponse {
            kind,
            message: err.to_string(),
            status,
        }
    }
}

impl From<&ProcessError> for ErrorResponse {
    fn from(err: &ProcessError) -> Self {
        if err.is_client_error() {
            ErrorResponse {
                kind: err.kind(),
                message: err.to_string(),
                status: 400,
            }
        } else {
            // Details stay in the log
            ErrorResponse {
                kind: err.kind(),
                message: "Internal processing error. Please try again.".to_string(),
                status: 500,
            }
        }
    }
}

impl From<&ConfigError> for ErrorResponse {
    fn from(err: &ConfigError) -> Self {
        ErrorResponse {
            kind: "invalid_config",
            message: err.to_string(),
            status: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aivis_core::DecodeError;

    #[test]
    fn test_accepts_allowed_types() {
        for ct in ["image/jpeg", "image/jpg", "image/png", "IMAGE/PNG", " image/jpeg "] {
            assert_eq!(validate_upload(100, Some(ct)), Ok(()), "{}", ct);
        }
        assert_eq!(validate_upload(100, None), Ok(()));
    }

    #[test]
    fn test_rejects_other_types() {
        assert_eq!(
            validate_upload(100, Some("image/gif")),
            Err(RequestError::UnsupportedContentType("image/gif".into()))
        );
        assert!(validate_upload(100, Some("")).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert_eq!(validate_upload(MAX_UPLOAD_BYTES, Some("image/png")), Ok(()));
        assert_eq!(
            validate_upload(MAX_UPLOAD_BYTES + 1, Some("image/png")),
            Err(RequestError::TooLarge {
                size: MAX_UPLOAD_BYTES + 1
            })
        );
        assert_eq!(validate_upload(0, None), Err(RequestError::Empty));
    }

    #[test]
    fn test_request_error_statuses() {
        let too_large = ErrorResponse::from(&RequestError::TooLarge { size: 1 });
        assert_eq!(too_large.status, 413);
        assert_eq!(too_large.kind, "file_too_large");

        let bad_type = ErrorResponse::from(&RequestError::UnsupportedContentType("x".into()));
        assert_eq!(bad_type.status, 400);
    }

    #[test]
    fn test_process_error_statuses() {
        let cases = [
            (ProcessError::InvalidFormat(DecodeError::InvalidFormat), 400),
            (ProcessError::NoFacesDetected, 400),
            (ProcessError::UnknownMode("ultra_safe".into()), 400),
        ];
        for (err, status) in cases {
            let resp = ErrorResponse::from(&err);
            assert_eq!(resp.status, status);
            assert_eq!(resp.kind, err.kind());
            assert_eq!(resp.message, err.to_string());
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ProcessError::InternalProcessingError("encoder exploded at 0x1234".into());
        let resp = ErrorResponse::from(&err);
        assert_eq!(resp.status, 500);
        assert_eq!(resp.kind, "internal_processing_error");
        assert!(!resp.message.contains("0x1234"));
    }

    #[test]
    fn test_unparseable_options() {
        let resp = ErrorResponse::unparseable("config", "missing field `quality`");
        assert_eq!(resp.kind, "invalid_config");
        assert_eq!(resp.status, 400);
        assert_eq!(resp.message, "Invalid config: missing field `quality`");
    }

    #[test]
    fn test_default_mode_is_registered() {
        assert!(aivis_core::ModeRegistry::default().resolve(DEFAULT_MODE).is_ok());
    }
}
