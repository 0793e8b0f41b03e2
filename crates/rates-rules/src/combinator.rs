//! Quote combinators.
//!
//! Every rule is built from two operations applied side by side:
//! feed averaging across redundant sources of one instrument, and
//! multiplication of two averaged legs that share a pivot currency.

use rates_core::types::Quote;

/// Arithmetic mean of each side, summed in the order given.
///
/// No weighting, outlier rejection or staleness check. Callers guarantee
/// a non-empty slice; an empty one yields NaN sides.
pub fn average(quotes: &[Quote]) -> Quote {
    let n = quotes.len() as f64;
    let (bid, ask) = quotes
        .iter()
        .fold((0.0, 0.0), |(bid, ask), q| (bid + q.bid, ask + q.ask));
    Quote::new(bid / n, ask / n)
}

/// Side-consistent product of two legs: bid with bid, ask with ask.
#[inline]
pub fn multiply(first: Quote, second: Quote) -> Quote {
    Quote::new(first.bid * second.bid, first.ask * second.ask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_two_sources() {
        let q = average(&[Quote::new(32.10, 32.12), Quote::new(32.12, 32.14)]);

        assert!((q.bid - (32.10 + 32.12) / 2.0).abs() < 1e-12);
        assert!((q.ask - (32.12 + 32.14) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_average_is_commutative_for_two_sources() {
        let a = Quote::new(1.0800, 1.0802);
        let b = Quote::new(1.0802, 1.0804);

        assert_eq!(average(&[a, b]), average(&[b, a]));
    }

    #[test]
    fn test_average_single_source_is_identity() {
        let q = Quote::new(1.2650, 1.2653);
        assert_eq!(average(&[q]), q);
    }

    #[test]
    fn test_average_three_sources() {
        let q = average(&[
            Quote::new(1.0, 2.0),
            Quote::new(2.0, 3.0),
            Quote::new(3.0, 4.0),
        ]);
        assert_eq!(q, Quote::new(2.0, 3.0));
    }

    #[test]
    fn test_multiply_keeps_sides() {
        let q = multiply(Quote::new(1.5, 2.0), Quote::new(10.0, 20.0));
        assert_eq!(q, Quote::new(15.0, 40.0));
    }
}
