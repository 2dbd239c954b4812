//! Diff negotiation
//!
//! Sends the local file list to the server's prepare operation and turns the
//! answer into a `DiffResult`. An unavailable server is an expected outcome:
//! the negotiator returns `None` and the caller falls back to a full upload.

pub mod diff;
pub mod models;

pub use diff::{DiffDiscrepancy, DiffResult};
pub use models::{DigestRef, FileListEntry, PrepareRequest, PrepareResponse, RawDiff};

use crate::endpoint::PublishEndpoint;
use crate::types::{ContentDigest, FileRecord};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Negotiates the diff for one publish attempt.
pub struct DiffNegotiator<'a> {
    endpoint: &'a dyn PublishEndpoint,
}

impl<'a> DiffNegotiator<'a> {
    pub fn new(endpoint: &'a dyn PublishEndpoint) -> Self {
        Self { endpoint }
    }

    /// Ask the server which of `records` it already stores.
    ///
    /// Returns `None` on transport failure, non-success status, or an
    /// unparseable body. Does not retry.
    pub async fn negotiate(&self, records: &[FileRecord]) -> Option<DiffResult> {
        let request = PrepareRequest::from_records(records);
        let response = match self.endpoint.prepare(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Diff negotiation unavailable, falling back to full upload");
                return None;
            }
        };

        let submitted: BTreeSet<ContentDigest> =
            records.iter().map(|record| record.digest.clone()).collect();
        let (diff, discrepancy) = DiffResult::reconcile(&response.diff, &submitted);
        if !discrepancy.is_clean() {
            warn!(
                unanswered = discrepancy.unanswered,
                conflicting = discrepancy.conflicting,
                unsolicited = discrepancy.unsolicited,
                malformed = discrepancy.malformed,
                "Server diff does not partition the submitted digests; treating unknowns as uncached"
            );
        }

        info!(
            cached = diff.cached.len(),
            uncached = diff.uncached.len(),
            "Diff negotiated"
        );
        Some(diff)
    }
}
