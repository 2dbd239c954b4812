//! CLI Tooling
//!
//! Command-line interface for publish operations. Each command is scoped to a
//! single vault directory.

use crate::config::{ConfigLoader, PublishConfig};
use crate::endpoint::HttpEndpoint;
use crate::error::PublishError;
use crate::negotiate::DiffNegotiator;
use crate::session::{Collaborators, FixedRoot, PublishOutcome, PublishSession};
use crate::tooling::notice::ConsoleNotifier;
use crate::tree::filter::PublishFilter;
use crate::tree::path::resolve_vault_root;
use crate::tree::scanner::TreeScanner;
use crate::types::FileRecord;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::json;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

/// Vault Publish CLI - incremental publishing of a document vault
#[derive(Parser)]
#[command(name = "vault-publish")]
#[command(about = "Publish a document vault, uploading only what the server lacks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault root directory
    #[arg(long, default_value = ".")]
    pub vault: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Publish the vault to the configured server
    Publish {
        /// Server URL (overrides configuration)
        #[arg(long)]
        server_url: Option<String>,
        /// Include the host-config directory
        #[arg(long)]
        include_config_dir: bool,
    },
    /// List the files a publish would consider
    Scan {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Ask the server which files it already has, without uploading
    Diff {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the vault configuration file
    Init {
        /// Server URL to store
        #[arg(long)]
        server_url: String,
        /// Include the host-config directory when publishing
        #[arg(long)]
        include_config_dir: bool,
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

/// CLI context for one vault
pub struct CliContext {
    vault_root: PathBuf,
    config: PublishConfig,
    session: PublishSession,
    runtime: tokio::runtime::Runtime,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(vault_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, PublishError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&vault_root)?,
        };
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            vault_root,
            config,
            session: PublishSession::new(),
            runtime,
        })
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PublishConfig {
        &mut self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, PublishError> {
        match command {
            Commands::Publish {
                server_url,
                include_config_dir,
            } => self.handle_publish(server_url.clone(), *include_config_dir),
            Commands::Scan { format } => self.handle_scan(format),
            Commands::Diff { format } => self.handle_diff(format),
            Commands::Init {
                server_url,
                include_config_dir,
                force,
            } => self.handle_init(server_url, *include_config_dir, *force),
        }
    }

    fn handle_publish(
        &self,
        server_url: Option<String>,
        include_config_dir: bool,
    ) -> Result<String, PublishError> {
        let mut config = self.config.clone();
        if let Some(url) = server_url {
            config.server_url = Some(url);
        }
        config.include_config_dir |= include_config_dir;

        let root = FixedRoot::new(self.vault_root.clone());
        let notifier = ConsoleNotifier::new(std::io::stderr().is_terminal());
        let collaborators = Collaborators::new(&root, &notifier);

        let outcome = self
            .runtime
            .block_on(self.session.publish(&config, &collaborators));
        match outcome {
            PublishOutcome::Published(report) => Ok(format!(
                "Published {} of {} files ({} already on server) at {}",
                report.uploaded,
                report.scanned,
                report.cached,
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            )),
            PublishOutcome::AlreadyRunning => Ok("A publish is already running".to_string()),
            PublishOutcome::Failed(failure) => Err(PublishError::Failed(failure.to_string())),
        }
    }

    fn scan(&self) -> Result<Vec<FileRecord>, PublishError> {
        let root = resolve_vault_root(&self.vault_root).map_err(|e| {
            PublishError::Environment(format!(
                "Vault not found at {}: {}",
                self.vault_root.display(),
                e
            ))
        })?;
        let filter = PublishFilter::from_config(&self.config);
        let scanner = TreeScanner::new(self.config.read_concurrency, self.config.scan_failure);
        let mut records = self
            .runtime
            .block_on(scanner.scan(&root, move |path| filter.includes(path)))?;
        records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(records)
    }

    fn handle_scan(&self, format: &str) -> Result<String, PublishError> {
        let records = self.scan()?;
        if format == "json" {
            let files: Vec<_> = records
                .iter()
                .map(|r| json!({ "sha1": r.digest, "path": r.relative_path }))
                .collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "total": records.len(),
                "files": files,
            }))?);
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["SHA-1", "Path"]);
        for record in &records {
            table.add_row(vec![record.digest.to_string(), record.relative_path.clone()]);
        }
        Ok(format!("{}\n{} files", table, records.len()))
    }

    fn handle_diff(&self, format: &str) -> Result<String, PublishError> {
        let endpoint = HttpEndpoint::from_config(&self.config)?;
        let records = self.scan()?;
        let diff = self
            .runtime
            .block_on(DiffNegotiator::new(&endpoint).negotiate(&records));

        let Some(diff) = diff else {
            info!("Negotiation unavailable");
            return Ok(if format == "json" {
                serde_json::to_string_pretty(&json!({
                    "negotiated": false,
                    "total": records.len(),
                }))?
            } else {
                format!(
                    "Negotiation unavailable; a publish would upload all {} files",
                    records.len()
                )
            });
        };

        let pending: Vec<&FileRecord> = records
            .iter()
            .filter(|r| diff.is_uncached(&r.digest))
            .collect();
        if format == "json" {
            let paths: Vec<&str> = pending.iter().map(|r| r.relative_path.as_str()).collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "negotiated": true,
                "total": records.len(),
                "cached": diff.cached.len(),
                "uncached": diff.uncached.len(),
                "upload": paths,
            }))?);
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec!["Pending upload"]);
        for record in &pending {
            table.add_row(vec![record.relative_path.clone()]);
        }
        Ok(format!(
            "{}\n{} cached, {} uncached digests; {} of {} files would be uploaded",
            table,
            diff.cached.len(),
            diff.uncached.len(),
            pending.len(),
            records.len()
        ))
    }

    fn handle_init(
        &self,
        server_url: &str,
        include_config_dir: bool,
        force: bool,
    ) -> Result<String, PublishError> {
        let path = ConfigLoader::vault_config_path(&self.vault_root);
        if path.exists() && !force {
            return Err(PublishError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        // Validates the URL before it is written.
        HttpEndpoint::new(server_url, None, Default::default(), None)?;

        let config = PublishConfig {
            include_config_dir,
            ..PublishConfig::default()
        }
        .with_server_url(server_url.trim());
        let content = toml::to_string_pretty(&config)
            .map_err(|e| PublishError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(format!("Wrote {}", path.display()))
    }
}
