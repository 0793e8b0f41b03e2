//! Configuration structures.

use serde::{Deserialize, Serialize};
use tracing::info;

use rates_core::error::RateError;
use rates_rules::{builtin_specs, RuleCatalog, RuleSpec};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl AppConfig {
    /// Compile the configured rule catalog.
    ///
    /// Any misconfigured rule fails the whole catalog, before a single rate
    /// is served.
    pub fn build_catalog(&self) -> Result<RuleCatalog, RateError> {
        let mut specs: Vec<RuleSpec> = Vec::new();
        if self.catalog.include_builtin {
            specs.extend(builtin_specs()?);
        }
        specs.extend(self.catalog.rules.iter().cloned());

        let catalog = RuleCatalog::from_specs(specs)?;
        if catalog.is_empty() {
            return Err(RateError::Config(
                "catalog defines no rules; enable include_builtin or add [[catalog.rules]]".into(),
            ));
        }

        info!(rules = catalog.len(), "Rule catalog loaded");
        Ok(catalog)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "fxrates".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Rule catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Register the built-in USDTRY/EURTRY/GBPTRY rules
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,
    /// Additional rules
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_config_str;
    use rates_core::error::CatalogError;
    use rates_core::types::Instrument;

    #[test]
    fn test_defaults_use_builtin_catalog() {
        let config = AppConfig::default();
        let catalog = config.build_catalog().unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_extra_rule_from_toml() {
        let config = load_config_str(
            r#"
            [app]
            name = "fxrates-test"
            environment = "test"

            [[catalog.rules]]
            output = "EURGBP"
            combinator = "multiply"

            [[catalog.rules.legs]]
            instrument = "EURUSD"
            sources = ["PF1", "PF2"]

            [[catalog.rules.legs]]
            instrument = "GBPUSD"
            sources = ["PF1", "PF2"]
            orientation = "inverted"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.name, "fxrates-test");
        let catalog = config.build_catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains(&Instrument::new("EURGBP").unwrap()));
    }

    #[test]
    fn test_misconfigured_rule_fails_catalog() {
        let config = load_config_str(
            r#"
            [catalog]
            include_builtin = false

            [[catalog.rules]]
            output = "EURTRY"
            combinator = "multiply"

            [[catalog.rules.legs]]
            instrument = "EURUSD"
            sources = ["PF1", "PF2"]
            "#,
        )
        .unwrap();

        let err = config.build_catalog().unwrap_err();
        assert!(matches!(
            err,
            RateError::Catalog(CatalogError::LegCount { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_of_builtin_rejected() {
        let config = load_config_str(
            r#"
            [[catalog.rules]]
            output = "USDTRY"
            combinator = "average"

            [[catalog.rules.legs]]
            instrument = "USDTRY"
            sources = ["PF3"]
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.build_catalog(),
            Err(RateError::Catalog(CatalogError::DuplicateRule(_)))
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let config = load_config_str("[catalog]\ninclude_builtin = false\n").unwrap();
        assert!(matches!(config.build_catalog(), Err(RateError::Config(_))));
    }

    #[test]
    fn test_invalid_instrument_rejected_at_load() {
        let result = load_config_str(
            r#"
            [[catalog.rules]]
            output = "EUR/TRY"
            combinator = "average"
            legs = []
            "#,
        );
        assert!(result.is_err());
    }
}
