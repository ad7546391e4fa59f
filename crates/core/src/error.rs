//! Error types for the choppiness indicator.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the choppiness indicator.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (zero window capacity, zero smoothing length).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data error (value out of its domain).
    #[error("Data error: {0}")]
    Data(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Is this a configuration error?
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
