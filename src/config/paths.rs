//! Platform path resolution for config and state files.

pub mod xdg_root;
