//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, CatalogSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed with `RATES__` override file values,
/// e.g. `RATES__LOGGING__LEVEL=debug`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("RATES")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Parse configuration from TOML text, without environment overrides.
pub fn load_config_str(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}
