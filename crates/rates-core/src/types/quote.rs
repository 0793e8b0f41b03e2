//! Bid/ask quote value type.

use serde::{Deserialize, Serialize};

/// A bid/ask pair for one instrument from one source.
///
/// The source and instrument identity travel outside the value, as the
/// [`QuoteKey`](super::QuoteKey) it is stored under. `ask >= bid` is a
/// provider guarantee and is never enforced here; a derived quote simply
/// inherits whatever its inputs carried.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Best bid price
    pub bid: f64,
    /// Best ask price
    pub ask: f64,
}

impl Quote {
    /// Create a new quote.
    pub const fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Get the mid price.
    #[inline]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Get the spread as a percentage of the mid price.
    pub fn spread_percent(&self) -> f64 {
        let mid = self.mid();
        if mid == 0.0 {
            0.0
        } else {
            (self.spread() / mid) * 100.0
        }
    }

    /// Check that both sides are finite and non-negative.
    ///
    /// Returns a human readable reason on failure. Nothing is clamped.
    pub fn validate(&self) -> Result<(), String> {
        for (side, value) in [("bid", self.bid), ("ask", self.ask)] {
            if !value.is_finite() {
                return Err(format!("{} is not finite ({})", side, value));
            }
            if value < 0.0 {
                return Err(format!("{} is negative ({})", side, value));
            }
        }
        Ok(())
    }

    /// Quote the reciprocal pair.
    ///
    /// Sides swap under inversion: the new bid is `1 / ask` and the new ask
    /// is `1 / bid`, so the spread keeps its meaning. Returns `None` unless
    /// both sides are strictly positive.
    pub fn invert(&self) -> Option<Self> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some(Self {
                bid: 1.0 / self.ask,
                ask: 1.0 / self.bid,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_calculations() {
        let quote = Quote::new(32.10, 32.12);

        assert!((quote.mid() - 32.11).abs() < 1e-9);
        assert!((quote.spread() - 0.02).abs() < 1e-9);
        assert!((quote.spread_percent() - 0.0623).abs() < 0.001);
    }

    #[test]
    fn test_validate_rejects_bad_sides() {
        assert!(Quote::new(1.08, 1.09).validate().is_ok());
        assert!(Quote::new(0.0, 0.0).validate().is_ok());

        let err = Quote::new(f64::NAN, 1.0).validate().unwrap_err();
        assert!(err.contains("bid"));

        let err = Quote::new(1.0, f64::INFINITY).validate().unwrap_err();
        assert!(err.contains("ask"));

        let err = Quote::new(-1.0, 1.0).validate().unwrap_err();
        assert!(err.contains("negative"));
    }

    #[test]
    fn test_invert_swaps_sides() {
        let quote = Quote::new(2.0, 4.0);
        let inverted = quote.invert().unwrap();

        assert_eq!(inverted.bid, 0.25);
        assert_eq!(inverted.ask, 0.5);
        assert!(inverted.bid <= inverted.ask);
    }

    #[test]
    fn test_invert_requires_positive_sides() {
        assert!(Quote::new(0.0, 1.0).invert().is_none());
        assert!(Quote::new(1.0, -1.0).invert().is_none());
    }

    #[test]
    fn test_quote_serde() {
        let quote: Quote = serde_json::from_str(r#"{"bid": 1.08, "ask": 1.0802}"#).unwrap();
        assert_eq!(quote, Quote::new(1.08, 1.0802));
    }
}
