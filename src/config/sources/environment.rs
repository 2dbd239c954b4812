//! Environment variable source: VAULT_PUBLISH_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Environment variable prefix for config overrides.
pub const ENV_PREFIX: &str = "VAULT_PUBLISH";

/// Add environment variable overlay to builder.
/// Uses VAULT_PUBLISH prefix and __ as separator, e.g. `VAULT_PUBLISH__SERVER_URL`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
