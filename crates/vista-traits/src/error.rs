//! Error types for trait operations.

use thiserror::Error;

/// Common error type for source operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TraitError {
    /// Connection to external service failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Requested resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Source not available
    #[error("source not available: {0}")]
    SourceNotAvailable(String),

    /// Operation timed out
    #[error("timeout")]
    Timeout,

    /// Parse/deserialization error
    #[error("parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Rate limited
    #[error("rate limited")]
    RateLimited,
}

impl From<std::io::Error> for TraitError {
    fn from(e: std::io::Error) -> Self {
        TraitError::IoError(e.to_string())
    }
}

impl From<vista_core::VistaError> for TraitError {
    fn from(e: vista_core::VistaError) -> Self {
        TraitError::ParseError(e.to_string())
    }
}
