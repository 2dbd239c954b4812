//! Tooling & Integration Layer
//!
//! Command-line adapter standing in for the host editor: it resolves the
//! vault, loads configuration, reports progress on the terminal, and calls
//! the publish entry point.

pub mod cli;
pub mod notice;

pub use cli::{Cli, CliContext, Commands};
pub use notice::ConsoleNotifier;
