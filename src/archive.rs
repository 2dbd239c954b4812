//! Archive Builder
//!
//! Packs the files the server lacks into an in-memory zip keyed by their
//! vault-relative paths. Without a diff every record is packed.

use crate::error::PublishError;
use crate::types::{ContentDigest, FileRecord};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeSet;
use std::io::{Cursor, Write};
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A built archive.
#[derive(Debug, Clone)]
pub struct Archive {
    pub bytes: Vec<u8>,
    /// Relative paths packed, in archive order
    pub entries: Vec<String>,
}

impl Archive {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Select the records that belong in the archive.
///
/// `uncached = None` means no diff was obtained, so everything is selected.
pub fn select_records<'r>(
    records: &'r [FileRecord],
    uncached: Option<&BTreeSet<ContentDigest>>,
) -> Vec<&'r FileRecord> {
    match uncached {
        Some(uncached) => records
            .iter()
            .filter(|record| uncached.contains(&record.digest))
            .collect(),
        None => records.iter().collect(),
    }
}

/// Builds publish archives.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    concurrency: usize,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new(8)
    }
}

impl ArchiveBuilder {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    /// Build an archive holding exactly one entry per selected record.
    ///
    /// A file that can no longer be read fails the build: its digest was
    /// reported to the server, so dropping it would leave the server without
    /// content it was promised.
    pub async fn build(
        &self,
        records: &[FileRecord],
        uncached: Option<&BTreeSet<ContentDigest>>,
    ) -> Result<Archive, PublishError> {
        let selected = select_records(records, uncached);
        debug!(selected = selected.len(), total = records.len(), "Building archive");

        let contents: Vec<(&FileRecord, Vec<u8>)> = stream::iter(selected)
            .map(|record| async move {
                let bytes = tokio::fs::read(&record.local_path).await?;
                Ok::<_, PublishError>((record, bytes))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut entries = Vec::with_capacity(contents.len());
        for (record, bytes) in contents {
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .large_file(bytes.len() as u64 >= u64::from(u32::MAX));
            writer.start_file(record.relative_path.as_str(), options)?;
            writer.write_all(&bytes)?;
            entries.push(record.relative_path.clone());
        }
        let bytes = writer.finish()?.into_inner();

        info!(entries = entries.len(), bytes = bytes.len(), "Archive built");
        Ok(Archive { bytes, entries })
    }
}
