//! Synthetic FX rate derivation CLI.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rates_monitor::{setup_logging, LogOptions};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let logging = cli::startup_logging(&cli.config);
    let log_level = cli::effective_log_level(cli.log_level.as_ref(), &logging);
    let _guard = setup_logging(&LogOptions {
        level: log_level,
        json: cli.json_logs || logging.format == "json",
        file: cli.log_file.clone().or_else(|| logging.file.map(PathBuf::from)),
    });

    // Execute command
    match cli.command {
        Commands::Rules(args) => cli::commands::rules::run(args, &cli.config).await,
        Commands::Derive(args) => cli::commands::derive::run(args, &cli.config).await,
        Commands::Dependents(args) => cli::commands::dependents::run(args, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
