//! Derive command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rates_core::error::DerivationError;
use rates_core::types::{Instrument, Quote};
use rates_data::load_quotes;
use rates_rules::DerivationReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::cli::{load_app_config, DeriveArgs};

/// Derived rates stamped with the time they were computed.
#[derive(Serialize)]
struct RateSnapshot<'a> {
    computed_at: DateTime<Utc>,
    rates: &'a BTreeMap<Instrument, Quote>,
    failed: BTreeMap<&'a Instrument, String>,
    not_ready: &'a [Instrument],
}

pub async fn run(args: DeriveArgs, config_path: &Path) -> Result<()> {
    let catalog = load_app_config(config_path)?.build_catalog()?;
    let deps = load_quotes(&args.quotes)
        .with_context(|| format!("Failed to load quotes from {}", args.quotes.display()))?;
    info!(quotes = deps.len(), rules = catalog.len(), "Deriving rates");

    let report = match &args.rate {
        Some(rate) => {
            let output: Instrument = rate.parse().context("Invalid instrument")?;
            let mut report = DerivationReport::default();
            match catalog.derive(&output, &deps) {
                Ok(quote) => {
                    report.derived.insert(output, quote);
                }
                Err(e @ DerivationError::UnknownRule(_)) => return Err(e.into()),
                Err(e) => {
                    report.failed.insert(e.output().clone(), e);
                }
            }
            report
        }
        None => catalog.derive_ready(&deps),
    };

    match args.output.as_str() {
        "json" => {
            let snapshot = RateSnapshot {
                computed_at: Utc::now(),
                rates: &report.derived,
                failed: report
                    .failed
                    .iter()
                    .map(|(output, e)| (output, e.to_string()))
                    .collect(),
                not_ready: &report.not_ready,
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        _ => print_text(&report),
    }

    if report.has_failures() {
        anyhow::bail!("{} rate(s) failed to derive", report.failed.len());
    }

    Ok(())
}

fn print_text(report: &DerivationReport) {
    println!(
        "{:<8} {:>14} {:>14} {:>14} {:>10}",
        "Rate", "Bid", "Ask", "Mid", "Spread %"
    );
    println!("──────────────────────────────────────────────────────────────");
    for (output, quote) in &report.derived {
        println!(
            "{:<8} {:>14.6} {:>14.6} {:>14.6} {:>10.4}",
            output.as_str(),
            quote.bid,
            quote.ask,
            quote.mid(),
            quote.spread_percent()
        );
    }

    for (output, e) in &report.failed {
        println!("{:<8} failed: {}", output.as_str(), e);
    }

    if !report.not_ready.is_empty() {
        let pending: Vec<&str> = report.not_ready.iter().map(Instrument::as_str).collect();
        println!();
        println!("Not ready (missing inputs): {}", pending.join(", "));
    }
}
