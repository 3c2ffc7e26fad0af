//! Error types for thimble-core

use crate::StatusCode;
use thiserror::Error;

/// Result type alias for thimble operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the thimble HTTP responder
#[derive(Debug, Error)]
pub enum Error {
    /// Unparseable request line, header, or body
    #[error("Malformed request: {0}")]
    Malformed(String),

    /// No header terminator within the read window
    #[error("Request head exceeds {limit} bytes")]
    HeadersTooLarge { limit: usize },

    /// Content-Length over the configured limit
    #[error("Body too large: {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },

    /// Route pattern rejected at registration
    #[error("Invalid route pattern: {0}")]
    InvalidPattern(#[from] thimble_router::PatternError),

    /// Unknown HTTP method name
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging subscriber could not be installed
    #[error("Logging init failed: {0}")]
    LoggingInit(String),
}

impl Error {
    /// Status written back when this error ends a request
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Malformed(_) | Error::HeadersTooLarge { .. } => StatusCode::BAD_REQUEST,
            Error::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::Malformed(reason.into())
    }
}
