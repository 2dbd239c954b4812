//! Content digest computation for vault files

use crate::types::ContentDigest;
use sha1::{Digest, Sha1};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the digest of an in-memory buffer.
pub fn digest_bytes(data: &[u8]) -> ContentDigest {
    ContentDigest::from_bytes(&Sha1::digest(data))
}

/// Compute the content digest of a file.
///
/// Returns `Ok(None)` when the path does not exist or is a directory. Any
/// other read failure is returned to the caller, which decides whether to
/// skip the entry or abort.
pub async fn digest_file(path: &Path) -> std::io::Result<Option<ContentDigest>> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };
    if metadata.is_dir() {
        return Ok(None);
    }

    let mut file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(Some(ContentDigest::from_bytes(&hasher.finalize())))
}
