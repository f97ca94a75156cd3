//! Error types for the progress engine.
//!
//! Data-quality problems (a ledger count that contradicts the scan) are not
//! errors; they are demoted to "no work summary" and logged. Everything here
//! is a genuine failure of configuration, input loading or traversal.

use thiserror::Error;

/// Errors surfaced to callers of the progress service and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    #[error("Source error: {0}")]
    SourceError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Traversal cancelled at {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
