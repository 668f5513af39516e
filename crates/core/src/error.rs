//! Error types for configuration handling.
//!
//! The diff pipeline itself is infallible; only the edges that read
//! user-supplied identifiers or settings can fail.

use thiserror::Error;

/// Errors that can occur while building diff configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Language identifier not recognised
    #[error("Unknown language '{0}'")]
    UnknownLanguage(String),

    /// Normalizer settings could not be decoded
    #[error("Invalid normalizer settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
