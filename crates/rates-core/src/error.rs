//! Error types for rate derivation.

use serde::Serialize;
use thiserror::Error;

use crate::types::{Instrument, QuoteKey, SourceId};

/// Top-level rate derivation error.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

}

/// Errors raised while evaluating a rule against a dependency map.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DerivationError {
    #[error("Missing input {key} required by {output}")]
    MissingInput { output: Instrument, key: QuoteKey },

    #[error("Invalid input {key} for {output}: {reason}")]
    InvalidInput {
        output: Instrument,
        key: QuoteKey,
        reason: String,
    },

    #[error("No rule registered for {0}")]
    UnknownRule(Instrument),
}

impl DerivationError {
    /// The derived instrument the failure belongs to.
    pub fn output(&self) -> &Instrument {
        match self {
            Self::MissingInput { output, .. } | Self::InvalidInput { output, .. } => output,
            Self::UnknownRule(output) => output,
        }
    }

    /// The offending source key, when the failure is tied to one.
    pub fn key(&self) -> Option<&QuoteKey> {
        match self {
            Self::MissingInput { key, .. } | Self::InvalidInput { key, .. } => Some(key),
            Self::UnknownRule(_) => None,
        }
    }
}

/// Rule catalog errors, detected when rules are loaded rather than evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Rule {output}: {combinator} requires {expected} leg(s), found {found}")]
    LegCount {
        output: Instrument,
        combinator: String,
        expected: usize,
        found: usize,
    },

    #[error("Rule {output}: leg {leg} has no sources")]
    NoSources { output: Instrument, leg: Instrument },

    #[error("Rule {output}: leg {leg} lists source {source_id} more than once")]
    DuplicateSource {
        output: Instrument,
        leg: Instrument,
        source_id: SourceId,
    },

    #[error("Rule {output}: legs cannot be oriented consistently: {detail}")]
    Orientation { output: Instrument, detail: String },

    #[error("Duplicate rule for {0}")]
    DuplicateRule(Instrument),

    #[error("Invalid rule key: {0}")]
    Key(#[from] KeyError),
}

/// Errors parsing instruments, sources and composite keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Invalid instrument '{0}': expected two distinct three-letter currency codes such as EURUSD")]
    InvalidInstrument(String),

    #[error("Invalid source '{0}': must be non-empty and must not contain '_'")]
    InvalidSource(String),

    #[error("Invalid quote key '{0}': expected <SOURCE>_<INSTRUMENT>")]
    InvalidKey(String),
}

/// Quote snapshot loading errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Quote file not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Duplicate quote for {0}")]
    DuplicateKey(QuoteKey),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
