//! CLI definitions.

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rates_config::{load_config, AppConfig, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rates")]
#[command(author, version, about = "Synthetic FX rate derivation from redundant price feeds")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level [default: config `logging.level`, else info]
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to this file (rotated daily)
    #[arg(long, env = "RATES_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the configured derivation rules
    Rules(RulesArgs),
    /// Derive rates from a quote snapshot
    Derive(DeriveArgs),
    /// Show which derived rates read a source quote
    Dependents(DependentsArgs),
    /// Validate configuration and rule catalog
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RulesArgs {
    /// Print the catalog as TOML rule tables
    #[arg(long)]
    pub toml: bool,
}

#[derive(clap::Args)]
pub struct DeriveArgs {
    /// Quote snapshot (CSV, or JSON object keyed by SOURCE_INSTRUMENT)
    #[arg(short, long)]
    pub quotes: PathBuf,

    /// Derive only this instrument
    #[arg(short, long)]
    pub rate: Option<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(clap::Args)]
pub struct DependentsArgs {
    /// Source quote key, e.g. PF1_USDTRY
    pub key: String,
}

/// Load the configuration file, or fall back to defaults when it is absent.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))
    } else {
        info!("No configuration at {}, using built-in defaults", path.display());
        Ok(AppConfig::default())
    }
}

/// The `[logging]` table of the configuration file, read before logging is up.
///
/// A missing file yields defaults. An unreadable one is reported on stderr
/// and also yields defaults; the command itself reports the error again.
pub fn startup_logging(path: &Path) -> LoggingConfig {
    if !path.exists() {
        return LoggingConfig::default();
    }
    match load_config(path) {
        Ok(config) => config.logging,
        Err(e) => {
            eprintln!("Ignoring logging settings in {}: {}", path.display(), e);
            LoggingConfig::default()
        }
    }
}

/// Effective log level: `--log-level` wins over `logging.level`.
pub fn effective_log_level(cli: Option<&LogLevel>, logging: &LoggingConfig) -> String {
    match cli {
        Some(level) => level.as_str().to_string(),
        None => logging.level.clone(),
    }
}
