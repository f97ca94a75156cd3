//! Configuration
//!
//! Layered configuration for the progress engine and CLI. Sources are merged
//! by [`MergeService`]: built-in defaults, the global config file, an
//! explicit file, then `ARCHIVE_PROGRESS_*` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use merge::service::MergeService;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Effective configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub traversal: TraversalConfig,
    pub cache: CacheConfig,
    pub snapshot: SnapshotConfig,
    pub logging: LoggingConfig,
}

impl ProgressConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        self.traversal.validate()?;
        if self.cache.totals_ttl_secs == 0 {
            return Err(ApiError::ConfigError(
                "cache.totals_ttl_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Depth and breadth bounds of a tree traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Depth used when a request names none
    pub default_depth: u32,
    /// Requested depths are clamped to this
    pub max_depth: u32,
    pub max_children_per_folder: usize,
    pub max_files_listed: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_depth: 2,
            max_depth: 10,
            max_children_per_folder: 1000,
            max_files_listed: 200,
        }
    }
}

impl TraversalConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.max_depth == 0 {
            return Err(ApiError::ConfigError(
                "traversal.max_depth must be at least 1".to_string(),
            ));
        }
        if self.default_depth > self.max_depth {
            return Err(ApiError::ConfigError(format!(
                "traversal.default_depth ({}) exceeds traversal.max_depth ({})",
                self.default_depth, self.max_depth
            )));
        }
        if self.max_children_per_folder == 0 || self.max_files_listed == 0 {
            return Err(ApiError::ConfigError(
                "traversal.max_children_per_folder and traversal.max_files_listed must be positive"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Requested depth, defaulted and clamped
    pub fn effective_depth(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_depth).min(self.max_depth)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of the cached archive totals
    pub totals_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            totals_ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Snapshot document (`.json`, `.yaml` or `.yml`)
    pub path: Option<PathBuf>,
}
