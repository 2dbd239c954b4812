//! Vault tree: hashing, path normalization, filtering, and scanning.

pub mod filter;
pub mod hasher;
pub mod path;
pub mod scanner;

pub use filter::PublishFilter;
pub use scanner::{ScanFailurePolicy, TreeScanner};
