//! Recursive vault enumeration producing content-addressed file records.

use crate::error::ScanError;
use crate::tree::hasher::digest_file;
use crate::tree::path::relative_slash_path;
use crate::types::FileRecord;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What to do when a single entry cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFailurePolicy {
    /// Log the entry and keep scanning.
    #[default]
    Skip,
    /// Stop the scan with the first error.
    Abort,
}

/// A file found by the walk, not yet hashed.
#[derive(Debug)]
struct Candidate {
    local_path: PathBuf,
    relative_path: String,
}

/// Walks a vault and hashes every included file.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    concurrency: usize,
    failure_policy: ScanFailurePolicy,
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new(8, ScanFailurePolicy::Skip)
    }
}

impl TreeScanner {
    pub fn new(concurrency: usize, failure_policy: ScanFailurePolicy) -> Self {
        Self {
            concurrency: concurrency.max(1),
            failure_policy,
        }
    }

    /// Scan `root`, keeping entries whose relative path passes `include`.
    ///
    /// A rejected directory is pruned without being read. Symbolic links are
    /// neither followed nor recorded. Result order is unspecified.
    pub async fn scan<F>(&self, root: &Path, include: F) -> Result<Vec<FileRecord>, ScanError>
    where
        F: Fn(&str) -> bool + Send + 'static,
    {
        let walk_root = root.to_path_buf();
        let policy = self.failure_policy;
        let candidates = tokio::task::spawn_blocking(move || walk(&walk_root, include, policy))
            .await
            .map_err(|e| ScanError::Task(e.to_string()))??;

        debug!(candidates = candidates.len(), "Walk finished, hashing files");

        let hashed: Vec<_> = stream::iter(candidates)
            .map(|candidate| async move {
                let digest = digest_file(&candidate.local_path).await;
                (candidate, digest)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut records = Vec::with_capacity(hashed.len());
        for (candidate, digest) in hashed {
            let digest = digest.map_err(|source| ScanError::Io {
                path: candidate.local_path.clone(),
                source,
            });
            // Vanished between walk and hash: nothing to record.
            let Some(Some(digest)) = settle(digest, policy)? else {
                continue;
            };
            debug!(path = %candidate.relative_path, digest = digest.short(), "Hashed file");
            records.push(FileRecord {
                digest,
                local_path: candidate.local_path,
                relative_path: candidate.relative_path,
            });
        }

        info!(root = %root.display(), files = records.len(), "Scan complete");
        Ok(records)
    }
}

fn walk<F>(root: &Path, include: F, policy: ScanFailurePolicy) -> Result<Vec<Candidate>, ScanError>
where
    F: Fn(&str) -> bool,
{
    let mut candidates = Vec::new();
    // Unrepresentable names pass the filter so the policy below decides them.
    let mut entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || relative_slash_path(root, entry.path())
                    .map(|relative| include(&relative))
                    .unwrap_or(true)
        });

    while let Some(entry) = entries.next() {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        });
        let Some(entry) = settle(entry, policy)? else {
            continue;
        };

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            debug!(path = %entry.path().display(), "Skipping symbolic link");
            continue;
        }
        let relative_path = match relative_slash_path(root, entry.path()) {
            Some(relative_path) => Ok(relative_path),
            None => {
                if file_type.is_dir() {
                    entries.skip_current_dir();
                }
                Err(ScanError::NonUtf8Path {
                    path: entry.path().to_path_buf(),
                })
            }
        };
        let Some(relative_path) = settle(relative_path, policy)? else {
            continue;
        };
        if file_type.is_dir() {
            continue;
        }

        candidates.push(Candidate {
            local_path: entry.into_path(),
            relative_path,
        });
    }

    Ok(candidates)
}

/// Apply the failure policy to one entry's outcome.
fn settle<T>(outcome: Result<T, ScanError>, policy: ScanFailurePolicy) -> Result<Option<T>, ScanError> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(e) => match policy {
            ScanFailurePolicy::Skip => {
                warn!(error = %e, "Skipping unreadable entry");
                Ok(None)
            }
            ScanFailurePolicy::Abort => Err(e),
        },
    }
}
