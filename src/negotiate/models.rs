//! Wire models for the prepare exchange.

use crate::types::{ContentDigest, FileRecord};
use serde::{Deserialize, Serialize};

/// One entry of the prepare file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListEntry {
    pub sha1: ContentDigest,
    pub path: String,
}

/// Body of `POST {server}/publish/prepare`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepareRequest {
    pub filelist: Vec<FileListEntry>,
}

impl PrepareRequest {
    pub fn from_records(records: &[FileRecord]) -> Self {
        Self {
            filelist: records
                .iter()
                .map(|record| FileListEntry {
                    sha1: record.digest.clone(),
                    path: record.relative_path.clone(),
                })
                .collect(),
        }
    }
}

/// A digest reference as the server may send it: bare, or inside an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DigestRef {
    Bare(String),
    Entry {
        #[serde(alias = "digest", alias = "hash")]
        sha1: String,
    },
}

impl DigestRef {
    pub fn digest(&self) -> Option<ContentDigest> {
        match self {
            DigestRef::Bare(value) => ContentDigest::parse(value),
            DigestRef::Entry { sha1 } => ContentDigest::parse(sha1),
        }
    }
}

/// Diff as the server reports it, before reconciliation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDiff {
    #[serde(default)]
    pub cached: Vec<DigestRef>,
    #[serde(default)]
    pub uncached: Vec<DigestRef>,
}

/// Body of a successful prepare response.
#[derive(Debug, Clone, Deserialize)]
pub struct PrepareResponse {
    pub diff: RawDiff,
}
