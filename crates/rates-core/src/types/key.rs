//! Instrument, source and composite quote key types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KeyError;

/// A currency pair such as `EURUSD`: base currency then quote currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instrument(String);

impl Instrument {
    /// Parse an instrument from its six-letter code.
    pub fn new(code: impl Into<String>) -> Result<Self, KeyError> {
        let code = code.into();
        if code.len() == 6
            && code.bytes().all(|b| b.is_ascii_uppercase())
            && code[..3] != code[3..]
        {
            Ok(Self(code))
        } else {
            Err(KeyError::InvalidInstrument(code))
        }
    }

    /// Build an instrument from base and quote currency codes.
    pub fn from_currencies(base: &str, quote: &str) -> Result<Self, KeyError> {
        Self::new(format!("{}{}", base, quote))
    }

    /// The base currency (first three letters).
    pub fn base(&self) -> &str {
        &self.0[..3]
    }

    /// The quote currency (last three letters).
    pub fn quote(&self) -> &str {
        &self.0[3..]
    }

    /// The reciprocal pair (`EURUSD` -> `USDEUR`).
    pub fn inverse(&self) -> Self {
        Self(format!("{}{}", self.quote(), self.base()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Instrument {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Instrument {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Instrument> for String {
    fn from(value: Instrument) -> Self {
        value.0
    }
}

/// A price source (platform) name such as `PF1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SourceId(String);

impl SourceId {
    pub fn new(name: impl Into<String>) -> Result<Self, KeyError> {
        let name = name.into();
        if name.is_empty() || name.contains('_') || name.chars().any(char::is_whitespace) {
            Err(KeyError::InvalidSource(name))
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SourceId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SourceId {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceId> for String {
    fn from(value: SourceId) -> Self {
        value.0
    }
}

/// Composite `(source, instrument)` key, rendered as `PF1_EURUSD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuoteKey {
    pub source: SourceId,
    pub instrument: Instrument,
}

impl QuoteKey {
    pub fn new(source: SourceId, instrument: Instrument) -> Self {
        Self { source, instrument }
    }
}

impl fmt::Display for QuoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.source, self.instrument)
    }
}

impl FromStr for QuoteKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, instrument) = s
            .rsplit_once('_')
            .ok_or_else(|| KeyError::InvalidKey(s.to_string()))?;
        let source = SourceId::new(source).map_err(|_| KeyError::InvalidKey(s.to_string()))?;
        let instrument =
            Instrument::new(instrument).map_err(|_| KeyError::InvalidKey(s.to_string()))?;
        Ok(Self { source, instrument })
    }
}

impl TryFrom<String> for QuoteKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuoteKey> for String {
    fn from(value: QuoteKey) -> Self {
        value.to_string()
    }
}
