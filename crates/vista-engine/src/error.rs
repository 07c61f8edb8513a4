//! Engine error types.

use thiserror::Error;

/// Engine error type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Live KPI values and the baseline snapshot cover different elements
    #[error(
        "baseline mismatch: live values missing from baseline [{}], baseline values missing from live [{}]",
        .missing_in_baseline.join(", "),
        .missing_in_live.join(", ")
    )]
    BaselineMismatch {
        /// Live elements with no baseline entry
        missing_in_baseline: Vec<String>,
        /// Baseline elements absent from the live selection
        missing_in_live: Vec<String>,
    },

    /// Invalid request parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Data source error
    #[error("data source error: {0}")]
    Source(String),
}

impl From<vista_traits::TraitError> for EngineError {
    fn from(e: vista_traits::TraitError) -> Self {
        EngineError::Source(e.to_string())
    }
}

impl From<vista_core::VistaError> for EngineError {
    fn from(e: vista_core::VistaError) -> Self {
        EngineError::InvalidRequest(e.to_string())
    }
}
