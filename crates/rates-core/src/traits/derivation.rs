//! Derivation trait definition.

use crate::error::DerivationError;
use crate::types::{DependencyMap, Instrument, Quote, QuoteKey};

/// A named, pure computation from source quotes to one derived quote.
///
/// Implementations hold no mutable state: the same dependency map must
/// always produce the same quote, and evaluation has no side effects.
/// That makes a rule safe to share across threads without coordination.
pub trait Derivation: Send + Sync {
    /// The instrument this rule produces.
    fn output(&self) -> &Instrument;

    /// Every key the rule reads, in evaluation order.
    fn required_keys(&self) -> &[QuoteKey];

    /// Derive the output quote.
    ///
    /// # Errors
    /// * `MissingInput` if any required key is absent
    /// * `InvalidInput` if a present quote is non-finite or negative
    fn derive(&self, deps: &DependencyMap) -> Result<Quote, DerivationError>;

    /// Check whether every required key is present.
    fn is_ready(&self, deps: &DependencyMap) -> bool {
        self.required_keys().iter().all(|key| deps.contains(key))
    }

    /// Check whether the rule reads `key`.
    fn depends_on(&self, key: &QuoteKey) -> bool {
        self.required_keys().contains(key)
    }
}
