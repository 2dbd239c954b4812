//! Publish states and outcomes.

use std::fmt;

/// Phase of the publish state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishState {
    #[default]
    Idle,
    Collecting,
    Negotiating,
    Archiving,
    Uploading,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishState::Idle => "idle",
            PublishState::Collecting => "collecting",
            PublishState::Negotiating => "negotiating",
            PublishState::Archiving => "archiving",
            PublishState::Uploading => "uploading",
        };
        f.write_str(name)
    }
}

/// Summary of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Files found by the scan
    pub scanned: usize,
    /// Files packed into the archive
    pub uploaded: usize,
    /// Digests the server already had
    pub cached: usize,
    /// Whether a diff was negotiated
    pub negotiated: bool,
    /// Upload response status
    pub status: u16,
}

/// Why a publish did not complete. Causes are kept for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishFailure {
    /// No server URL configured, or it is unusable
    Configuration(String),
    /// Vault root could not be resolved
    Environment(String),
    /// Scan aborted under the strict failure policy
    Scan(String),
    /// Archive could not be assembled
    Archive(String),
    /// Upload failed or was rejected
    Upload(String),
}

impl fmt::Display for PublishFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishFailure::Configuration(cause) => write!(f, "configuration error: {}", cause),
            PublishFailure::Environment(cause) => write!(f, "environment error: {}", cause),
            PublishFailure::Scan(cause) => write!(f, "scan failed: {}", cause),
            PublishFailure::Archive(cause) => write!(f, "archive failed: {}", cause),
            PublishFailure::Upload(cause) => write!(f, "upload failed: {}", cause),
        }
    }
}

/// Result of one call to the publish entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(PublishReport),
    /// Another publish was in flight; nothing was done
    AlreadyRunning,
    Failed(PublishFailure),
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, PublishOutcome::Published(_))
    }
}
