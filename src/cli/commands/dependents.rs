//! Dependent rates command.

use anyhow::{Context, Result};
use rates_core::types::QuoteKey;
use std::path::Path;

use crate::cli::{load_app_config, DependentsArgs};

pub async fn run(args: DependentsArgs, config_path: &Path) -> Result<()> {
    let key: QuoteKey = args
        .key
        .parse()
        .with_context(|| format!("Invalid quote key '{}'", args.key))?;
    let catalog = load_app_config(config_path)?.build_catalog()?;

    let dependents = catalog.dependents_of(&key);
    if dependents.is_empty() {
        println!("No derived rate reads {}", key);
    } else {
        println!("Rates recomputed when {} changes:", key);
        for output in dependents {
            println!("  {}", output);
        }
    }

    Ok(())
}
