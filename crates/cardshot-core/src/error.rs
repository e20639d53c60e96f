//! Error types for cardshot.

use thiserror::Error;

/// Main error type for cardshot operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Detection was requested before warm-up completed
    #[error("Detector not ready: call warm_up() before detecting cards")]
    NotReady,

    /// Unexpected failure inside a detection pass
    #[error("Detection failed: {0}")]
    Detection(String),

    /// Selector the host or parser could not handle
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Detection options outside their accepted ranges
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Warm-up sequence failed
    #[error("Warm-up failed: {0}")]
    WarmUp(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
