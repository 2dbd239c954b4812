//! Configuration
//!
//! Layered publish settings: built-in defaults, the global config file, the
//! vault's own config file, then `VAULT_PUBLISH__*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;

use crate::logging::LoggingConfig;
use crate::tree::scanner::ScanFailurePolicy;
use serde::{Deserialize, Serialize};

/// Default name of the host editor's config subtree.
pub const DEFAULT_CONFIG_DIR: &str = ".obsidian";

/// File name of the per-vault config file, stored inside the config subtree.
pub const VAULT_CONFIG_FILE: &str = "vault-publish.toml";

/// Which upload responses count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadAcceptance {
    /// Any 2xx status.
    #[default]
    Success,
    /// Exactly 204 No Content, for servers running the legacy whole-vault mode.
    NoContent,
}

impl UploadAcceptance {
    pub fn accepts(self, status: u16) -> bool {
        match self {
            UploadAcceptance::Success => (200..300).contains(&status),
            UploadAcceptance::NoContent => status == 204,
        }
    }
}

/// Publish configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Base URL of the publish server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    /// Publish the host-config subtree too
    #[serde(default)]
    pub include_config_dir: bool,

    /// Name of the host-config subtree, relative to the vault root
    #[serde(default = "default_config_dir")]
    pub config_dir: String,

    /// File name suffixes of OS artifacts that are never published
    #[serde(default = "default_artifact_suffixes")]
    pub artifact_suffixes: Vec<String>,

    /// Bearer credential sent with both requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,

    /// Upload acceptance rule
    #[serde(default)]
    pub accept: UploadAcceptance,

    /// Per-entry failure handling while scanning
    #[serde(default)]
    pub scan_failure: ScanFailurePolicy,

    /// Concurrent file reads while hashing and archiving
    #[serde(default = "default_read_concurrency")]
    pub read_concurrency: usize,

    /// Request timeout in seconds; unset leaves it to the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing)]
    pub logging: LoggingConfig,
}

fn default_config_dir() -> String {
    DEFAULT_CONFIG_DIR.to_string()
}

fn default_artifact_suffixes() -> Vec<String> {
    vec![".DS_Store".to_string()]
}

fn default_read_concurrency() -> usize {
    8
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            include_config_dir: false,
            config_dir: default_config_dir(),
            artifact_suffixes: default_artifact_suffixes(),
            credential: None,
            accept: UploadAcceptance::default(),
            scan_failure: ScanFailurePolicy::default(),
            read_concurrency: default_read_concurrency(),
            request_timeout_secs: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl PublishConfig {
    /// Configured server URL, if non-blank.
    pub fn server_url(&self) -> Option<&str> {
        self.server_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }
}
