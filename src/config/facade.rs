//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::{PublishConfig, DEFAULT_CONFIG_DIR, VAULT_CONFIG_FILE};
use config::ConfigError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the per-vault config file.
    pub fn vault_config_path(vault_root: &Path) -> PathBuf {
        vault_root.join(DEFAULT_CONFIG_DIR).join(VAULT_CONFIG_FILE)
    }

    /// Load configuration from files and environment.
    pub fn load(vault_root: &Path) -> Result<PublishConfig, ConfigError> {
        MergeService::load(vault_root)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<PublishConfig, ConfigError> {
        MergeService::load_from_file(path)
    }
}
