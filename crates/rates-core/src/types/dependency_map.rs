//! Per-invocation mapping of source quotes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{DerivationError, KeyError};
use crate::types::{Instrument, Quote, QuoteKey};

/// Source quotes handed to a rule for a single evaluation.
///
/// Built fresh by the caller for every invocation and only read by rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    quotes: HashMap<QuoteKey, Quote>,
}

impl DependencyMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quote, returning the one it replaced.
    pub fn insert(&mut self, key: QuoteKey, quote: Quote) -> Option<Quote> {
        self.quotes.insert(key, quote)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: QuoteKey, quote: Quote) -> Self {
        self.insert(key, quote);
        self
    }

    pub fn get(&self, key: &QuoteKey) -> Option<&Quote> {
        self.quotes.get(key)
    }

    /// Look up a key that `output` cannot be derived without.
    pub fn require(&self, output: &Instrument, key: &QuoteKey) -> Result<Quote, DerivationError> {
        self.quotes
            .get(key)
            .copied()
            .ok_or_else(|| DerivationError::MissingInput {
                output: output.clone(),
                key: key.clone(),
            })
    }

    pub fn contains(&self, key: &QuoteKey) -> bool {
        self.quotes.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &QuoteKey> {
        self.quotes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuoteKey, &Quote)> {
        self.quotes.iter()
    }
}

impl FromIterator<(QuoteKey, Quote)> for DependencyMap {
    fn from_iter<T: IntoIterator<Item = (QuoteKey, Quote)>>(iter: T) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<HashMap<String, Quote>> for DependencyMap {
    type Error = KeyError;

    /// Accept the string-keyed form (`"PF1_EURUSD" -> Quote`) used at the
    /// orchestrator boundary.
    fn try_from(raw: HashMap<String, Quote>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, quote)| Ok((key.parse::<QuoteKey>()?, quote)))
            .collect()
    }
}
