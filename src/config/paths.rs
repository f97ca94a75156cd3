//! Platform directories for config and state files.

use crate::error::ApiError;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_NAME: &str = "archive-progress";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", APP_NAME, APP_NAME)
}

/// `<config dir>/config.toml`; `None` when no home directory is known
pub fn global_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Platform state directory, falling back to the data directory where
/// the platform has no state dir
pub fn state_dir() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs().ok_or_else(|| {
        ApiError::ConfigError("Could not determine platform directories (HOME not set)".to_string())
    })?;
    Ok(dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf())
}
