//! List rules command.

use anyhow::Result;
use rates_core::traits::Derivation;
use rates_rules::{Combinator, LegOrientation};
use serde::Serialize;
use std::path::Path;

use crate::cli::{load_app_config, RulesArgs};

#[derive(Serialize)]
struct RuleTables<'a> {
    rules: Vec<&'a rates_rules::RuleSpec>,
}

pub async fn run(args: RulesArgs, config_path: &Path) -> Result<()> {
    let catalog = load_app_config(config_path)?.build_catalog()?;

    if args.toml {
        let tables = RuleTables {
            rules: catalog.specs(),
        };
        println!("{}", toml::to_string_pretty(&tables)?);
        return Ok(());
    }

    println!("Derivation Rules");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for rule in catalog.iter() {
        let spec = rule.spec();
        let kind = match spec.combinator {
            Combinator::Average => "feed average",
            Combinator::Multiply => "average each leg, then multiply",
        };
        println!("  {}", spec.output);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", kind);
        for leg in &spec.legs {
            let orientation = match leg.orientation {
                LegOrientation::Direct => "",
                LegOrientation::Inverted => " (inverted)",
            };
            let sources: Vec<&str> = leg.sources.iter().map(|s| s.as_str()).collect();
            println!("    {}{} from {}", leg.instrument, orientation, sources.join(", "));
        }
        let keys: Vec<String> = rule.required_keys().iter().map(|k| k.to_string()).collect();
        println!("  inputs: {}", keys.join(", "));
        println!();
    }

    Ok(())
}
