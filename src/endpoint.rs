//! Publish server endpoint
//!
//! The two-request exchange with the publish server: `prepare` to learn
//! which digests are already stored, `upload` to send the archive and the
//! manifest.

pub mod contract;
pub mod http;

pub use contract::{PublishEndpoint, UploadPayload, UploadReceipt};
pub use http::HttpEndpoint;
