//! Error types for document loading and configuration.
//!
//! Provides a unified error type covering I/O, serialization, unsupported
//! document formats, and configuration validation.

use thiserror::Error;

/// Errors that can occur while loading documents or configuration.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension maps to no known document format.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
