//! Endpoint contract used by the negotiator and the publish session.

use crate::error::PublishError;
use crate::negotiate::{DiffResult, PrepareRequest, PrepareResponse};
use async_trait::async_trait;

/// Archive and manifest sent in the final request.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    /// Zip archive bytes
    pub archive: Vec<u8>,
    /// Reconciled diff, absent when negotiation was unavailable
    pub diff: Option<DiffResult>,
}

/// Server acknowledgement of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
}

/// Remote side of a publish.
///
/// Implementations report non-accepted statuses as `PublishError::UnexpectedStatus`.
/// Neither call retries.
#[async_trait]
pub trait PublishEndpoint: Send + Sync {
    /// Submit the local file list and receive the server's diff.
    async fn prepare(&self, request: &PrepareRequest) -> Result<PrepareResponse, PublishError>;

    /// Upload the archive and manifest.
    async fn upload(&self, payload: UploadPayload) -> Result<UploadReceipt, PublishError>;
}
