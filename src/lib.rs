//! Vault Publish: Incremental Content-Addressed Publishing
//!
//! Publishes a local document vault to a remote server, transferring only the
//! files the server does not already hold. Files are identified by the SHA-1
//! of their content; a prepare exchange tells the client which digests the
//! server lacks, and a single multipart upload carries an archive of those
//! files plus the negotiated diff.

pub mod archive;
pub mod concurrency;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod negotiate;
pub mod session;
pub mod tooling;
pub mod tree;
pub mod types;

pub use config::PublishConfig;
pub use error::{PublishError, ScanError};
pub use session::{publish, Collaborators, PublishOutcome, PublishSession};
pub use types::{ContentDigest, FileRecord};
