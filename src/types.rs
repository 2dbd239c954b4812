//! Core types for the publish pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Length of a hex-encoded SHA-1 digest.
pub const DIGEST_HEX_LEN: usize = 40;

/// ContentDigest: lowercase hex SHA-1 of a file's bytes.
///
/// Identity is by content, so two files with equal bytes share a digest
/// regardless of where they live in the vault.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parse a digest string as sent by the server.
    ///
    /// Accepts upper or lower case and normalizes to lowercase; returns `None`
    /// for anything that is not a 160-bit hex value.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.len() != DIGEST_HEX_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// FileRecord: one scanned vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Content identity
    pub digest: ContentDigest,
    /// Absolute path on the local filesystem
    pub local_path: PathBuf,
    /// Forward-slash path relative to the vault root
    pub relative_path: String,
}
