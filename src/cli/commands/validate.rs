//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use rates_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    match config.build_catalog() {
        Ok(catalog) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Built-in rules: {}", config.catalog.include_builtin);
            println!("Extra rules: {}", config.catalog.rules.len());
            let outputs: Vec<&str> = catalog.outputs().into_iter().map(|o| o.as_str()).collect();
            println!("Derived rates: {}", outputs.join(", "));
        }
        Err(e) => {
            println!("Rule catalog error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
