//! Vault config file stored inside the host-config subtree.

use crate::config::ConfigLoader;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

/// Add `<vault>/.obsidian/vault-publish.toml` as an optional source.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vault_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = ConfigLoader::vault_config_path(vault_root);
    Ok(builder.add_source(File::from(path).required(false)))
}
