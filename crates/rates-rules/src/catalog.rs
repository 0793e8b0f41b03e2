//! Rule catalog: the registry of derived instruments.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use rates_core::error::{CatalogError, DerivationError};
use rates_core::traits::Derivation;
use rates_core::types::{DependencyMap, Instrument, Quote, QuoteKey};

use crate::rule::{Rule, RuleSpec};

/// Outcome of evaluating every rule against one dependency map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DerivationReport {
    /// Successfully derived quotes
    pub derived: BTreeMap<Instrument, Quote>,
    /// Rules whose inputs were present but failed to evaluate
    pub failed: BTreeMap<Instrument, DerivationError>,
    /// Rules skipped because at least one input was absent
    pub not_ready: Vec<Instrument>,
}

impl DerivationReport {
    /// Whether any ready rule failed.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Registry mapping output instruments to compiled rules.
///
/// All rules are validated when the catalog is built, so a catalog that
/// exists never contains a misconfigured rule.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: BTreeMap<Instrument, Rule>,
}

impl RuleCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register every specification.
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for spec in specs {
            catalog.register(spec)?;
        }
        Ok(catalog)
    }

    /// Compile and register one specification.
    pub fn register(&mut self, spec: RuleSpec) -> Result<(), CatalogError> {
        if self.rules.contains_key(&spec.output) {
            return Err(CatalogError::DuplicateRule(spec.output));
        }
        let rule = spec.compile()?;
        debug!(
            output = %spec.output,
            combinator = %spec.combinator,
            inputs = rule.required_keys().len(),
            "Registered rule"
        );
        self.rules.insert(spec.output, rule);
        Ok(())
    }

    pub fn get(&self, output: &Instrument) -> Option<&Rule> {
        self.rules.get(output)
    }

    pub fn contains(&self, output: &Instrument) -> bool {
        self.rules.contains_key(output)
    }

    /// Registered output instruments, sorted.
    pub fn outputs(&self) -> Vec<&Instrument> {
        self.rules.keys().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Specifications of every rule, sorted by output.
    pub fn specs(&self) -> Vec<&RuleSpec> {
        self.rules.values().map(Rule::spec).collect()
    }

    /// Derive a single instrument.
    pub fn derive(&self, output: &Instrument, deps: &DependencyMap) -> Result<Quote, DerivationError> {
        self.rules
            .get(output)
            .ok_or_else(|| DerivationError::UnknownRule(output.clone()))?
            .derive(deps)
    }

    /// Derive every instrument, failed or not.
    pub fn derive_all(&self, deps: &DependencyMap) -> BTreeMap<Instrument, Result<Quote, DerivationError>> {
        self.rules
            .iter()
            .map(|(output, rule)| (output.clone(), rule.derive(deps)))
            .collect()
    }

    /// Derive the instruments whose inputs are all present.
    ///
    /// Rules with absent inputs are listed as not ready instead of failing;
    /// no rule ever falls back to a partial set of sources.
    pub fn derive_ready(&self, deps: &DependencyMap) -> DerivationReport {
        let mut report = DerivationReport::default();

        for (output, rule) in &self.rules {
            if !rule.is_ready(deps) {
                debug!(output = %output, "Skipping rule with missing inputs");
                report.not_ready.push(output.clone());
                continue;
            }
            match rule.derive(deps) {
                Ok(quote) => {
                    report.derived.insert(output.clone(), quote);
                }
                Err(e) => {
                    warn!(output = %output, error = %e, "Rate derivation failed");
                    report.failed.insert(output.clone(), e);
                }
            }
        }

        report
    }

    /// Derived instruments that read `key` and need recomputing when it changes.
    pub fn dependents_of(&self, key: &QuoteKey) -> Vec<&Instrument> {
        self.rules
            .iter()
            .filter(|(_, rule)| rule.depends_on(key))
            .map(|(output, _)| output)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Combinator, LegSpec};
    use rates_core::types::SourceId;

    fn inst(code: &str) -> Instrument {
        Instrument::new(code).unwrap()
    }

    fn key(s: &str) -> QuoteKey {
        s.parse().unwrap()
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::builtin().unwrap()
    }

    fn try_inputs() -> DependencyMap {
        DependencyMap::new()
            .with(key("PF1_USDTRY"), Quote::new(32.10, 32.12))
            .with(key("PF2_USDTRY"), Quote::new(32.12, 32.14))
            .with(key("PF1_EURUSD"), Quote::new(1.0800, 1.0802))
            .with(key("PF2_EURUSD"), Quote::new(1.0802, 1.0804))
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = catalog();

        assert_eq!(catalog.len(), 3);
        let outputs: Vec<&str> = catalog.outputs().into_iter().map(Instrument::as_str).collect();
        assert_eq!(outputs, vec!["EURTRY", "GBPTRY", "USDTRY"]);
        assert_eq!(catalog.get(&inst("USDTRY")).unwrap().combinator(), Combinator::Average);
        assert_eq!(catalog.get(&inst("GBPTRY")).unwrap().combinator(), Combinator::Multiply);
    }

    #[test]
    fn test_derive_unknown_rule() {
        let err = catalog().derive(&inst("JPYTRY"), &try_inputs()).unwrap_err();
        assert_eq!(err, DerivationError::UnknownRule(inst("JPYTRY")));
    }

    #[test]
    fn test_derive_gbptry() {
        let deps = try_inputs()
            .with(key("PF1_GBPUSD"), Quote::new(1.2650, 1.2652))
            .with(key("PF2_GBPUSD"), Quote::new(1.2652, 1.2654));

        let quote = catalog().derive(&inst("GBPTRY"), &deps).unwrap();
        assert!((quote.bid - 1.2651 * 32.11).abs() < 1e-4);
        assert!((quote.ask - 1.2653 * 32.13).abs() < 1e-4);
    }

    #[test]
    fn test_derive_ready_skips_incomplete_rules() {
        let report = catalog().derive_ready(&try_inputs());

        assert_eq!(report.derived.len(), 2);
        assert!(report.derived.contains_key(&inst("USDTRY")));
        assert!(report.derived.contains_key(&inst("EURTRY")));
        assert_eq!(report.not_ready, vec![inst("GBPTRY")]);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_derive_ready_reports_invalid_inputs() {
        let deps = try_inputs().with(key("PF1_USDTRY"), Quote::new(f64::NAN, 32.12));
        let report = catalog().derive_ready(&deps);

        assert!(report.derived.is_empty());
        assert!(report.failed.contains_key(&inst("USDTRY")));
        assert_eq!(report.failed[&inst("EURTRY")].key(), Some(&key("PF1_USDTRY")));
    }

    #[test]
    fn test_report_serializes_failures() {
        let deps = try_inputs().with(key("PF2_EURUSD"), Quote::new(-1.0, 1.0804));
        let report = catalog().derive_ready(&deps);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failed"]["EURTRY"]["kind"], "invalid_input");
        assert_eq!(json["failed"]["EURTRY"]["detail"]["key"], "PF2_EURUSD");
        assert_eq!(json["not_ready"][0], "GBPTRY");
        assert!(json["derived"]["USDTRY"]["bid"].is_number());
    }

    #[test]
    fn test_derive_all_includes_missing() {
        let results = catalog().derive_all(&try_inputs());

        assert_eq!(results.len(), 3);
        assert!(results[&inst("USDTRY")].is_ok());
        assert!(matches!(
            results[&inst("GBPTRY")],
            Err(DerivationError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_partial_feed_hard_fails() {
        let deps = DependencyMap::new().with(key("PF1_USDTRY"), Quote::new(32.10, 32.12));

        let err = catalog().derive(&inst("USDTRY"), &deps).unwrap_err();
        assert_eq!(err.key(), Some(&key("PF2_USDTRY")));
    }

    #[test]
    fn test_dependents_of() {
        let catalog = catalog();

        let usdtry: Vec<&str> = catalog
            .dependents_of(&key("PF1_USDTRY"))
            .into_iter()
            .map(Instrument::as_str)
            .collect();
        assert_eq!(usdtry, vec!["EURTRY", "GBPTRY", "USDTRY"]);

        let gbpusd: Vec<&str> = catalog
            .dependents_of(&key("PF2_GBPUSD"))
            .into_iter()
            .map(Instrument::as_str)
            .collect();
        assert_eq!(gbpusd, vec!["GBPTRY"]);

        assert!(catalog.dependents_of(&key("PF3_USDTRY")).is_empty());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let sources = vec![SourceId::new("PF1").unwrap()];
        let spec = RuleSpec::average(inst("USDTRY"), LegSpec::new(inst("USDTRY"), sources));

        let err = RuleCatalog::from_specs(vec![spec.clone(), spec]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRule(inst("USDTRY")));
    }

    #[test]
    fn test_catalog_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleCatalog>();

        let catalog = std::sync::Arc::new(catalog());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = catalog.clone();
                std::thread::spawn(move || catalog.derive(&inst("EURTRY"), &try_inputs()).unwrap())
            })
            .collect();

        let quotes: Vec<Quote> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(quotes.windows(2).all(|w| w[0] == w[1]));
    }
}
