//! Reconciling the server's diff against the digests actually submitted.

use super::models::RawDiff;
use crate::types::ContentDigest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Partition of submitted digests into server-known and server-unknown.
///
/// Always disjoint, and together they cover exactly the submitted set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    pub cached: BTreeSet<ContentDigest>,
    pub uncached: BTreeSet<ContentDigest>,
}

/// Ways the server's answer failed to partition the submitted set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDiscrepancy {
    /// Submitted digests the server did not mention
    pub unanswered: usize,
    /// Digests the server listed as both cached and uncached
    pub conflicting: usize,
    /// Digests the server mentioned that were never submitted
    pub unsolicited: usize,
    /// Entries that were not valid digests
    pub malformed: usize,
}

impl DiffDiscrepancy {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl DiffResult {
    /// Build a partition from the server's raw answer.
    ///
    /// Anything not positively reported as cached is treated as uncached, so an
    /// inconsistent answer causes extra data to be sent, never less.
    pub fn reconcile(raw: &RawDiff, submitted: &BTreeSet<ContentDigest>) -> (Self, DiffDiscrepancy) {
        let mut discrepancy = DiffDiscrepancy::default();
        let mut collect = |entries: &[super::models::DigestRef]| -> BTreeSet<ContentDigest> {
            let mut set = BTreeSet::new();
            for entry in entries {
                match entry.digest() {
                    Some(digest) if submitted.contains(&digest) => {
                        set.insert(digest);
                    }
                    Some(_) => discrepancy.unsolicited += 1,
                    None => discrepancy.malformed += 1,
                }
            }
            set
        };
        let reported_cached = collect(&raw.cached);
        let reported_uncached = collect(&raw.uncached);

        let mut result = DiffResult::default();
        for digest in submitted {
            let cached = reported_cached.contains(digest);
            let uncached = reported_uncached.contains(digest);
            match (cached, uncached) {
                (true, false) => {
                    result.cached.insert(digest.clone());
                }
                (false, true) => {
                    result.uncached.insert(digest.clone());
                }
                (true, true) => {
                    discrepancy.conflicting += 1;
                    result.uncached.insert(digest.clone());
                }
                (false, false) => {
                    discrepancy.unanswered += 1;
                    result.uncached.insert(digest.clone());
                }
            }
        }

        (result, discrepancy)
    }

    pub fn is_uncached(&self, digest: &ContentDigest) -> bool {
        self.uncached.contains(digest)
    }
}
