//! Inclusion filter applied to vault-relative paths during a scan.

use crate::config::PublishConfig;

/// Decides which vault entries take part in a publish.
///
/// Paths are the forward-slash relative paths produced by the scanner, so the
/// same filter behaves identically on every platform.
#[derive(Debug, Clone)]
pub struct PublishFilter {
    artifact_suffixes: Vec<String>,
    config_dir: Option<String>,
}

impl PublishFilter {
    pub fn new(artifact_suffixes: Vec<String>, config_dir: Option<String>) -> Self {
        let config_dir = config_dir
            .map(|dir| dir.trim_matches('/').to_string())
            .filter(|dir| !dir.is_empty());
        Self {
            artifact_suffixes,
            config_dir,
        }
    }

    /// Build the filter a publish session uses.
    ///
    /// The host-config subtree is excluded unless the user opted in.
    pub fn from_config(config: &PublishConfig) -> Self {
        let config_dir = if config.include_config_dir {
            None
        } else {
            Some(config.config_dir.clone())
        };
        Self::new(config.artifact_suffixes.clone(), config_dir)
    }

    /// Filter that accepts every entry.
    pub fn allow_all() -> Self {
        Self::new(Vec::new(), None)
    }

    pub fn includes(&self, relative_path: &str) -> bool {
        if self
            .artifact_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && relative_path.ends_with(suffix.as_str()))
        {
            return false;
        }
        if let Some(dir) = &self.config_dir {
            if relative_path == dir
                || relative_path
                    .strip_prefix(dir.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            {
                return false;
            }
        }
        true
    }
}

impl Default for PublishFilter {
    fn default() -> Self {
        Self::from_config(&PublishConfig::default())
    }
}
