//! Declarative rule specifications and the generic evaluator.
//!
//! A [`RuleSpec`] is plain configuration: the output instrument, the legs
//! it reads and how they combine. [`RuleSpec::compile`] checks the shape
//! once, at load time, and produces a [`Rule`] that evaluates any number
//! of dependency maps.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use rates_core::error::{CatalogError, DerivationError};
use rates_core::traits::Derivation;
use rates_core::types::{DependencyMap, Instrument, Quote, QuoteKey, SourceId};

use crate::combinator::{average, multiply};

/// How an averaged leg enters the combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegOrientation {
    /// Use the quoted pair as is
    #[default]
    Direct,
    /// Use the reciprocal of the quoted pair
    Inverted,
}

/// One instrument averaged across a list of sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSpec {
    /// Instrument as quoted by the sources
    pub instrument: Instrument,
    /// Sources to average, in summation order
    pub sources: Vec<SourceId>,
    /// Orientation applied after averaging
    #[serde(default)]
    pub orientation: LegOrientation,
}

impl LegSpec {
    /// Create a direct leg.
    pub fn new(instrument: Instrument, sources: Vec<SourceId>) -> Self {
        Self {
            instrument,
            sources,
            orientation: LegOrientation::Direct,
        }
    }

    /// Use the reciprocal of this leg.
    pub fn inverted(mut self) -> Self {
        self.orientation = LegOrientation::Inverted;
        self
    }

    /// The pair this leg contributes once oriented.
    pub fn effective_instrument(&self) -> Instrument {
        match self.orientation {
            LegOrientation::Direct => self.instrument.clone(),
            LegOrientation::Inverted => self.instrument.inverse(),
        }
    }

    /// Source keys read by this leg.
    pub fn keys(&self) -> impl Iterator<Item = QuoteKey> + '_ {
        self.sources
            .iter()
            .map(|source| QuoteKey::new(source.clone(), self.instrument.clone()))
    }
}

/// How the averaged legs of a rule are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Feed averaging only: one leg, output is its mean
    Average,
    /// Triangulation: two legs averaged, then multiplied side by side
    Multiply,
}

impl Combinator {
    /// Number of legs this combinator consumes.
    pub fn leg_count(&self) -> usize {
        match self {
            Combinator::Average => 1,
            Combinator::Multiply => 2,
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Average => f.write_str("average"),
            Combinator::Multiply => f.write_str("multiply"),
        }
    }
}

/// Declarative description of one derived instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Instrument produced by the rule
    pub output: Instrument,
    /// Combination applied to the averaged legs
    pub combinator: Combinator,
    /// Legs in combination order
    pub legs: Vec<LegSpec>,
}

impl RuleSpec {
    /// Feed-averaging rule over a single leg.
    pub fn average(output: Instrument, leg: LegSpec) -> Self {
        Self {
            output,
            combinator: Combinator::Average,
            legs: vec![leg],
        }
    }

    /// Cross-rate rule: `output = first × second` after averaging.
    pub fn cross(output: Instrument, first: LegSpec, second: LegSpec) -> Self {
        Self {
            output,
            combinator: Combinator::Multiply,
            legs: vec![first, second],
        }
    }

    /// Validate the specification and build an evaluable rule.
    pub fn compile(&self) -> Result<Rule, CatalogError> {
        self.validate()?;
        let required_keys = self.legs.iter().flat_map(|leg| leg.keys()).collect();
        Ok(Rule {
            spec: self.clone(),
            required_keys,
        })
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let expected = self.combinator.leg_count();
        if self.legs.len() != expected {
            return Err(CatalogError::LegCount {
                output: self.output.clone(),
                combinator: self.combinator.to_string(),
                expected,
                found: self.legs.len(),
            });
        }

        for leg in &self.legs {
            if leg.sources.is_empty() {
                return Err(CatalogError::NoSources {
                    output: self.output.clone(),
                    leg: leg.instrument.clone(),
                });
            }
            let mut seen = HashSet::new();
            for source in &leg.sources {
                if !seen.insert(source) {
                    return Err(CatalogError::DuplicateSource {
                        output: self.output.clone(),
                        leg: leg.instrument.clone(),
                        source_id: source.clone(),
                    });
                }
            }
        }

        self.validate_orientation()
    }

    fn validate_orientation(&self) -> Result<(), CatalogError> {
        let out = &self.output;
        let legs: Vec<Instrument> = self.legs.iter().map(LegSpec::effective_instrument).collect();

        let consistent = match legs.as_slice() {
            [leg] => leg == out,
            [first, second] => {
                first.quote() == second.base()
                    && Instrument::from_currencies(first.base(), second.quote())
                        .map_or(false, |chained| &chained == out)
            }
            _ => false,
        };

        if consistent {
            Ok(())
        } else {
            let chain = legs
                .iter()
                .map(Instrument::as_str)
                .collect::<Vec<_>>()
                .join(" x ");
            Err(CatalogError::Orientation {
                output: out.clone(),
                detail: format!("oriented legs {} do not yield {}", chain, out),
            })
        }
    }
}

/// A validated rule, evaluated by the generic evaluator.
#[derive(Debug, Clone)]
pub struct Rule {
    spec: RuleSpec,
    required_keys: Vec<QuoteKey>,
}

impl Rule {
    /// The specification this rule was compiled from.
    pub fn spec(&self) -> &RuleSpec {
        &self.spec
    }

    pub fn combinator(&self) -> Combinator {
        self.spec.combinator
    }

    /// Average one leg across its sources and orient it.
    ///
    /// Each source of an inverted leg must be invertible on its own, so a
    /// failure names the source that carried the zero side.
    fn resolve_leg(&self, leg: &LegSpec, deps: &DependencyMap) -> Result<Quote, DerivationError> {
        let mut quotes = Vec::with_capacity(leg.sources.len());
        for key in leg.keys() {
            let quote = deps.require(self.output(), &key)?;
            let checked = quote.validate().and_then(|()| match leg.orientation {
                LegOrientation::Inverted if quote.invert().is_none() => Err(format!(
                    "{} quote has a zero side and cannot be inverted",
                    leg.instrument
                )),
                _ => Ok(()),
            });
            checked.map_err(|reason| DerivationError::InvalidInput {
                output: self.output().clone(),
                key,
                reason,
            })?;
            quotes.push(quote);
        }

        let averaged = average(&quotes);
        Ok(match leg.orientation {
            LegOrientation::Direct => averaged,
            LegOrientation::Inverted => averaged
                .invert()
                .unwrap_or_else(|| unreachable!("mean of strictly positive sides is positive")),
        })
    }
}

impl Derivation for Rule {
    fn output(&self) -> &Instrument {
        &self.spec.output
    }

    fn required_keys(&self) -> &[QuoteKey] {
        &self.required_keys
    }

    fn derive(&self, deps: &DependencyMap) -> Result<Quote, DerivationError> {
        // Absence is reported before any value problem.
        for key in &self.required_keys {
            deps.require(self.output(), key)?;
        }

        let legs = self
            .spec
            .legs
            .iter()
            .map(|leg| self.resolve_leg(leg, deps))
            .collect::<Result<Vec<_>, _>>()?;

        let quote = match (self.spec.combinator, legs.as_slice()) {
            (Combinator::Average, [leg]) => *leg,
            (Combinator::Multiply, [first, second]) => multiply(*first, *second),
            _ => unreachable!("leg count is checked when the rule is compiled"),
        };

        debug!(output = %self.output(), bid = quote.bid, ask = quote.ask, "Derived rate");
        Ok(quote)
    }
}
