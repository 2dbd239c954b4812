//! Capabilities the publish core consumes from its host.

use crate::endpoint::PublishEndpoint;
use std::path::PathBuf;
use std::time::Duration;

/// Resolves the vault's absolute base path.
pub trait VaultRootResolver: Send + Sync {
    /// `None` when the host has no filesystem-backed vault.
    fn base_path(&self) -> Option<PathBuf>;
}

/// Fixed vault root, for hosts that know the path up front.
#[derive(Debug, Clone)]
pub struct FixedRoot(pub Option<PathBuf>);

impl FixedRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Some(path.into()))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl VaultRootResolver for FixedRoot {
    fn base_path(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Progress and result reporting. Never consulted for control decisions.
pub trait Notifier: Send + Sync {
    /// Display a message, optionally for a limited time.
    fn show(&self, message: &str, duration: Option<Duration>);

    /// Replace the message currently displayed.
    fn update(&self, message: &str);

    /// Dismiss the current message.
    fn hide(&self);
}

/// Everything a publish attempt needs from the host.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub root: &'a dyn VaultRootResolver,
    pub notifier: &'a dyn Notifier,
    /// Endpoint override; `None` builds an HTTP endpoint from the config
    pub endpoint: Option<&'a dyn PublishEndpoint>,
}

impl<'a> Collaborators<'a> {
    pub fn new(root: &'a dyn VaultRootResolver, notifier: &'a dyn Notifier) -> Self {
        Self {
            root,
            notifier,
            endpoint: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: &'a dyn PublishEndpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}
