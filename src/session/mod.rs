//! Publish Session
//!
//! Orchestrates one publish attempt: collect, negotiate, archive, upload.
//! Every failure is caught here and turned into a `PublishOutcome`; nothing
//! escapes to the host.

pub mod collaborators;
pub mod state;

pub use collaborators::{Collaborators, FixedRoot, Notifier, VaultRootResolver};
pub use state::{PublishFailure, PublishOutcome, PublishReport, PublishState};

use crate::archive::ArchiveBuilder;
use crate::concurrency::PublishGate;
use crate::config::PublishConfig;
use crate::endpoint::{HttpEndpoint, PublishEndpoint, UploadPayload};
use crate::negotiate::DiffNegotiator;
use crate::tree::filter::PublishFilter;
use crate::tree::path::resolve_vault_root;
use crate::tree::scanner::TreeScanner;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// User-facing messages.
pub mod messages {
    pub const SERVER_URL_NOT_SET: &str = "Publish server url not set.";
    pub const VAULT_NOT_FOUND: &str = "Vault not found.";
    pub const COLLECTING: &str = "Collecting content...";
    pub const PUBLISHING: &str = "Publishing content...";
    pub const PUBLISHED: &str = "Published!";
    pub const FAILED: &str = "Publish failed!";
}

/// How long the progress notice stays up if never hidden.
pub const PROGRESS_NOTICE_DURATION: Duration = Duration::from_secs(60);

/// Publish session; owns the single-flight gate.
///
/// Clones share the gate and state, so a host keeps one session (or clones of
/// it) for its whole lifetime.
#[derive(Debug, Clone, Default)]
pub struct PublishSession {
    gate: PublishGate,
    state: Arc<Mutex<PublishState>>,
}

/// Returns the state to `Idle` when a publish attempt ends.
struct IdleOnDrop<'a>(&'a Mutex<PublishState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        *self.0.lock() = PublishState::Idle;
    }
}

impl PublishSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_publishing(&self) -> bool {
        self.gate.is_publishing()
    }

    pub fn state(&self) -> PublishState {
        *self.state.lock()
    }

    fn transition(&self, next: PublishState) {
        *self.state.lock() = next;
        info!(state = %next, "Publish state");
    }

    /// Run one publish attempt.
    ///
    /// A call made while another publish is in flight returns
    /// `AlreadyRunning` without scanning or touching the network.
    pub async fn publish(
        &self,
        config: &PublishConfig,
        collaborators: &Collaborators<'_>,
    ) -> PublishOutcome {
        let Some(_guard) = self.gate.try_acquire() else {
            info!("Publish already in progress, ignoring request");
            return PublishOutcome::AlreadyRunning;
        };
        let _idle = IdleOnDrop(&self.state);
        self.run(config, collaborators).await
    }

    async fn run(&self, config: &PublishConfig, collaborators: &Collaborators<'_>) -> PublishOutcome {
        let notifier = collaborators.notifier;
        self.transition(PublishState::Collecting);

        if config.server_url().is_none() {
            notifier.show(messages::SERVER_URL_NOT_SET, None);
            return PublishOutcome::Failed(PublishFailure::Configuration(
                "server url not set".to_string(),
            ));
        }

        let http_endpoint;
        let endpoint: &dyn PublishEndpoint = match collaborators.endpoint {
            Some(endpoint) => endpoint,
            None => match HttpEndpoint::from_config(config) {
                Ok(endpoint) => {
                    http_endpoint = endpoint;
                    &http_endpoint
                }
                Err(e) => {
                    error!(error = %e, "Cannot build publish endpoint");
                    notifier.show(messages::FAILED, None);
                    return PublishOutcome::Failed(PublishFailure::Configuration(e.to_string()));
                }
            },
        };

        notifier.show(messages::COLLECTING, Some(PROGRESS_NOTICE_DURATION));
        let root = match collaborators.root.base_path().map(|p| resolve_vault_root(&p)) {
            Some(Ok(root)) => root,
            Some(Err(e)) => {
                warn!(error = %e, "Vault root cannot be resolved");
                return self.fail_environment(notifier, e.to_string());
            }
            None => return self.fail_environment(notifier, "vault root unavailable".to_string()),
        };

        let filter = PublishFilter::from_config(config);
        let scanner = TreeScanner::new(config.read_concurrency, config.scan_failure);
        let records = match scanner.scan(&root, move |path| filter.includes(path)).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, "Scan aborted");
                return self.fail(notifier, PublishFailure::Scan(e.to_string()));
            }
        };

        self.transition(PublishState::Negotiating);
        let diff = DiffNegotiator::new(endpoint).negotiate(&records).await;

        self.transition(PublishState::Archiving);
        let archive = match ArchiveBuilder::new(config.read_concurrency)
            .build(&records, diff.as_ref().map(|d| &d.uncached))
            .await
        {
            Ok(archive) => archive,
            Err(e) => {
                error!(error = %e, "Archive build failed");
                return self.fail(notifier, PublishFailure::Archive(e.to_string()));
            }
        };

        self.transition(PublishState::Uploading);
        notifier.update(messages::PUBLISHING);
        let uploaded = archive.len();
        let cached = diff.as_ref().map(|d| d.cached.len()).unwrap_or(0);
        let negotiated = diff.is_some();
        let payload = UploadPayload {
            archive: archive.bytes,
            diff,
        };

        match endpoint.upload(payload).await {
            Ok(receipt) => {
                info!(
                    scanned = records.len(),
                    uploaded,
                    cached,
                    status = receipt.status,
                    "Publish complete"
                );
                notifier.hide();
                notifier.show(messages::PUBLISHED, None);
                PublishOutcome::Published(PublishReport {
                    scanned: records.len(),
                    uploaded,
                    cached,
                    negotiated,
                    status: receipt.status,
                })
            }
            Err(e) => {
                error!(error = %e, "Upload failed");
                self.fail(notifier, PublishFailure::Upload(e.to_string()))
            }
        }
    }

    fn fail_environment(&self, notifier: &dyn Notifier, cause: String) -> PublishOutcome {
        notifier.hide();
        notifier.show(messages::VAULT_NOT_FOUND, None);
        PublishOutcome::Failed(PublishFailure::Environment(cause))
    }

    fn fail(&self, notifier: &dyn Notifier, failure: PublishFailure) -> PublishOutcome {
        notifier.hide();
        notifier.show(messages::FAILED, None);
        PublishOutcome::Failed(failure)
    }
}

/// One-shot publish with a fresh session.
///
/// Hosts that can trigger publishes repeatedly should keep a `PublishSession`
/// so re-entrant calls are dropped.
pub async fn publish(config: &PublishConfig, collaborators: &Collaborators<'_>) -> PublishOutcome {
    PublishSession::new().publish(config, collaborators).await
}
