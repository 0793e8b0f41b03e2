//! Built-in Turkish lira catalog.
//!
//! | Output | Legs                       | Combinator |
//! |--------|----------------------------|------------|
//! | USDTRY | PF1/PF2 USDTRY             | average    |
//! | EURTRY | PF1/PF2 EURUSD, USDTRY     | multiply   |
//! | GBPTRY | PF1/PF2 GBPUSD, USDTRY     | multiply   |

use rates_core::error::CatalogError;
use rates_core::types::{Instrument, SourceId};

use crate::catalog::RuleCatalog;
use crate::rule::{LegSpec, RuleSpec};

/// Platforms every built-in leg is averaged across.
pub const BUILTIN_SOURCES: [&str; 2] = ["PF1", "PF2"];

/// Specifications of the built-in rules.
pub fn builtin_specs() -> Result<Vec<RuleSpec>, CatalogError> {
    let sources = BUILTIN_SOURCES
        .iter()
        .map(|s| SourceId::new(*s))
        .collect::<Result<Vec<_>, _>>()?;
    let leg = |code: &str| -> Result<LegSpec, CatalogError> {
        Ok(LegSpec::new(Instrument::new(code)?, sources.clone()))
    };

    Ok(vec![
        RuleSpec::average(Instrument::new("USDTRY")?, leg("USDTRY")?),
        RuleSpec::cross(Instrument::new("EURTRY")?, leg("EURUSD")?, leg("USDTRY")?),
        RuleSpec::cross(Instrument::new("GBPTRY")?, leg("GBPUSD")?, leg("USDTRY")?),
    ])
}

impl RuleCatalog {
    /// Catalog holding the built-in rules.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_specs(builtin_specs()?)
    }
}
