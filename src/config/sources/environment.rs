//! Environment variable source: ARCHIVE_PROGRESS_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

pub const ENV_PREFIX: &str = "ARCHIVE_PROGRESS";

/// Add environment variable overlay to builder.
/// `ARCHIVE_PROGRESS_TRAVERSAL__MAX_DEPTH=4` sets `traversal.max_depth`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
