//! MergeService: orchestrates sources, applies merge policy, deserializes to PublishConfig.

use crate::config::sources::{environment, global_file, vault_file};
use crate::config::PublishConfig;
use config::{ConfigError, File};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the vault and standard sources.
    /// Precedence: global file (lowest) -> vault file -> environment (highest).
    pub fn load(vault_root: &Path) -> Result<PublishConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = vault_file::add_to_builder(builder, vault_root)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<PublishConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(File::from(path));
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}
