//! Error types for the publish pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while walking and hashing the vault tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not valid UTF-8: {path}")]
    NonUtf8Path { path: PathBuf },

    #[error("Scan task failed: {0}")]
    Task(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Publish failed: {0}")]
    Failed(String),
}

impl From<config::ConfigError> for PublishError {
    fn from(err: config::ConfigError) -> Self {
        PublishError::Config(err.to_string())
    }
}
