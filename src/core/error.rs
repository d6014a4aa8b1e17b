//! Error types shared across the engine.

use poem::http::StatusCode;
use thiserror::Error;

/// Main error type for QR engine operations.
#[derive(Debug, Error)]
pub enum QrError {
    /// A required field is missing or malformed. Always user-correctable.
    #[error("invalid `{field}`: {reason}")]
    Validation { field: String, reason: String },

    /// Unknown payload type in a single or bulk request.
    #[error("unknown payload type `{0}`; valid types: {valid}", valid = crate::core::registry::type_names())]
    InvalidType(String),

    /// The image was read successfully but contains no QR symbol.
    #[error("no QR code found in image")]
    DecodeNotFound,

    /// Collaborator failure, unreadable image bytes, or an unexpected
    /// internal fault.
    #[error("processing failed: {0}")]
    Processing(String),
}

impl QrError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        QrError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Missing-required-field error naming an example value, so the message
    /// alone is enough to correct the request.
    pub fn missing(field: &str, example: &str) -> Self {
        QrError::Validation {
            field: field.to_string(),
            reason: format!("missing required field `{field}` (e.g. {field}={example})"),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            QrError::Validation { .. } | QrError::InvalidType(_) => StatusCode::BAD_REQUEST,
            QrError::DecodeNotFound => StatusCode::UNPROCESSABLE_ENTITY,
            QrError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for QrError {
    fn from(err: anyhow::Error) -> Self {
        QrError::Processing(err.to_string())
    }
}
