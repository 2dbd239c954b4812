//! Built-in defaults seeded before any file or environment source.

use crate::config::DEFAULT_CONFIG_DIR;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder with scalar defaults.
///
/// Keys not set here fall back to the serde defaults on `PublishConfig`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("include_config_dir", false)?
        .set_default("config_dir", DEFAULT_CONFIG_DIR)?
        .set_default("accept", "success")?
        .set_default("scan_failure", "skip")?
        .set_default("read_concurrency", 8_i64)
}
