//! Currency conversion through a single USD-based rate table.

pub mod service;
pub mod types;

pub use service::{Clock, HttpRateProvider, RateProvider, RateService, SystemClock};
pub use types::{RateSnapshot, BASE_CURRENCY};

use crate::shared::error::ConvertError;
use std::collections::HashMap;

/// Convert an amount between two currency codes using a base-currency rate
/// table. Rates are expressed relative to [`BASE_CURRENCY`].
///
/// Same-currency conversions and zero amounts short-circuit without touching
/// the table, so an identity conversion never fails on an empty snapshot.
pub fn convert_currency(
    amount: f64,
    from: &str,
    to: &str,
    rates: &HashMap<String, f64>,
) -> Result<f64, ConvertError> {
    if from == to {
        return Ok(amount);
    }
    if amount == 0.0 {
        return Ok(0.0);
    }

    let in_base = if from == BASE_CURRENCY {
        amount
    } else {
        amount / rate_for(rates, from)?
    };

    if to == BASE_CURRENCY {
        return Ok(in_base);
    }

    Ok(in_base * rate_for(rates, to)?)
}

/// Look up a non-zero rate; a zero rate is as unusable as a missing one.
fn rate_for(rates: &HashMap<String, f64>, code: &str) -> Result<f64, ConvertError> {
    rates
        .get(code)
        .copied()
        .filter(|rate| *rate != 0.0)
        .ok_or_else(|| ConvertError::RateUnavailable(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[test]
    fn test_identity_ignores_rate_table() {
        let empty = HashMap::new();
        assert_eq!(convert_currency(100.0, "USD", "USD", &empty).unwrap(), 100.0);
        assert_eq!(convert_currency(7.5, "XYZ", "XYZ", &empty).unwrap(), 7.5);
    }

    #[test]
    fn test_zero_amount_short_circuits() {
        let empty = HashMap::new();
        assert_eq!(convert_currency(0.0, "USD", "EUR", &empty).unwrap(), 0.0);
    }

    #[test]
    fn test_usd_to_eur() {
        let table = rates(&[("EUR", 0.85)]);
        assert_eq!(convert_currency(100.0, "USD", "EUR", &table).unwrap(), 85.0);
    }

    #[test]
    fn test_eur_to_usd_normalizes_through_base() {
        let table = rates(&[("EUR", 0.85)]);
        let result = convert_currency(85.0, "EUR", "USD", &table).unwrap();
        assert!((result - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_rate_triangulation() {
        let table = rates(&[("EUR", 0.85), ("GBP", 0.73)]);
        let result = convert_currency(100.0, "EUR", "GBP", &table).unwrap();
        let expected = 100.0 / 0.85 * 0.73;
        assert!((result - expected).abs() < 1e-9);
        assert!((result - 85.88).abs() < 0.01);
    }

    #[test]
    fn test_missing_rate_is_typed_error() {
        let empty = HashMap::new();
        assert_eq!(
            convert_currency(50.0, "USD", "XYZ", &empty),
            Err(ConvertError::RateUnavailable("XYZ".to_string()))
        );
    }

    #[test]
    fn test_zero_rate_is_unusable() {
        let table = rates(&[("EUR", 0.0)]);
        assert_eq!(
            convert_currency(10.0, "USD", "EUR", &table),
            Err(ConvertError::RateUnavailable("EUR".to_string()))
        );
    }
}
