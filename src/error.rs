//! Error types for the Paideia learning engine
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for error propagation at the edges.
//!
//! The engine favors graceful degradation: missing data (new user, empty
//! ledger, cold-start category) produces neutral defaults, not errors.
//! The variants here cover configuration problems and programmer-error
//! class misuse, which are expected to propagate to the caller.

use thiserror::Error;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Skill category absent from the curriculum configuration
    #[error("Unknown skill category: {0}")]
    UnknownCategory(String),

    /// Underlying store operation failed
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Convert anyhow::Error to EngineError
impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Other(err.to_string())
    }
}
