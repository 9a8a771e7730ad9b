// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    /// Bad command line, detected before any configuration is touched.
    #[error("{0}")]
    Usage(String),

    /// Storage directory or global configuration unusable.
    #[error("Global configuration error: {0}")]
    GlobalConfig(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration failed to load and the cause was already written to
    /// the error stream.
    #[error("configuration '{0}' could not be loaded")]
    ConfigReported(String),

    /// Configuration loaded but the request cannot be carried out.
    #[error("{0}")]
    Validation(String),

    #[error("lock error on {path}: {source}")]
    LockIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{operation} failed: {reason}")]
    Execution { operation: String, reason: String },

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunnerError {
    /// True when the message has already reached the operator and must not
    /// be printed again by the top level.
    pub fn already_reported(&self) -> bool {
        matches!(self, RunnerError::ConfigReported(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RunnerError>;
