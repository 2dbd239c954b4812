//! Vault Publish CLI Binary
//!
//! Command-line interface for publishing a document vault.

use anyhow::Context;
use clap::Parser;
use std::process;
use vault_publish::logging::init_logging;
use vault_publish::tooling::cli::{Cli, CliContext};

fn run(cli: Cli) -> anyhow::Result<String> {
    let mut context = CliContext::new(cli.vault.clone(), cli.config.clone())
        .with_context(|| format!("initializing vault {}", cli.vault.display()))?;

    let logging = &mut context.config_mut().logging;
    if let Some(level) = cli.log_level {
        logging.level = level;
    }
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    if let Some(output) = cli.log_output {
        logging.output = output;
    }
    if cli.log_file.is_some() {
        logging.file = cli.log_file;
    }
    init_logging(Some(&context.config().logging)).context("initializing logging")?;

    Ok(context.execute(&cli.command)?)
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
