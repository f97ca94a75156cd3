//! Base layer every merge starts from.

use crate::config::ProgressConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the serialized defaults, so partial files only
/// override what they name.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&ProgressConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
