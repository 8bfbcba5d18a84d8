//! Error types for calltrace-core

use thiserror::Error;

/// Errors raised while building a logger from configuration.
#[derive(Debug, Error)]
pub enum CalltraceError {
    /// Level outside 0..=4 (or an unknown level name)
    #[error("invalid log level '{0}', expected 0-4")]
    InvalidLevel(String),

    /// Mode string other than queue, list or cascade
    #[error("invalid mode '{0}', expected queue, list or cascade")]
    InvalidMode(String),

    /// Configuration document could not be parsed
    #[error("failed to parse logger config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CalltraceError>;
