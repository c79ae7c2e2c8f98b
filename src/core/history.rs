//! Mock historical rate series for the currency chart endpoint.
//!
//! There is no upstream history API on the free tier, so the series is
//! generated around the pair's current rate with period-scaled fluctuation.

use chrono::{Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub rate: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub base: String,
    pub target: String,
    pub period: String,
    pub data: Vec<HistoryPoint>,
    pub generated: String,
}

/// Seed rates for common pairs, used when no live snapshot can resolve the
/// pair. Values are indicative only; the series is mock data either way.
static FALLBACK_PAIR_RATES: &[(&str, &str, f64)] = &[
    ("USD", "EUR", 0.85),
    ("USD", "GBP", 0.73),
    ("USD", "JPY", 110.0),
    ("USD", "CAD", 1.25),
    ("USD", "AUD", 1.35),
    ("USD", "CHF", 0.92),
    ("USD", "CNY", 6.45),
    ("USD", "MXN", 17.5),
    ("USD", "BRL", 5.2),
    ("USD", "COP", 4100.0),
    ("EUR", "USD", 1.18),
    ("EUR", "GBP", 0.86),
    ("EUR", "JPY", 129.5),
    ("GBP", "USD", 1.37),
    ("GBP", "EUR", 1.16),
    ("JPY", "USD", 0.009),
];

fn period_days(period: &str) -> i64 {
    match period {
        "7d" | "1w" => 7,
        "1m" => 30,
        "3m" => 90,
        "6m" => 180,
        "1y" => 365,
        "5y" => 1825,
        _ => 7,
    }
}

/// Fluctuation band widens with the period length.
fn period_volatility(period: &str) -> f64 {
    match period {
        "7d" | "1w" => 0.02,
        "1m" => 0.05,
        "3m" => 0.08,
        "6m" => 0.12,
        "1y" => 0.20,
        _ => 0.30,
    }
}

/// Resolve a seed rate for a pair, trying the inverse when only the reverse
/// direction is listed.
pub fn fallback_pair_rate(base: &str, target: &str) -> f64 {
    if let Some((_, _, rate)) = FALLBACK_PAIR_RATES
        .iter()
        .find(|(b, t, _)| *b == base && *t == target)
    {
        return *rate;
    }
    if let Some((_, _, rate)) = FALLBACK_PAIR_RATES
        .iter()
        .find(|(b, t, _)| *b == target && *t == base)
    {
        return 1.0 / rate;
    }
    1.0
}

/// Generate a daily series around `pair_rate`, oldest point first, ending at
/// today. Rates are clamped positive and formatted to six decimal places.
pub fn generate_history(base: &str, target: &str, period: &str, pair_rate: f64) -> HistoryResponse {
    let days = period_days(period);
    let volatility = period_volatility(period);
    let today = Utc::now();

    let mut data = Vec::with_capacity(days as usize + 1);
    for i in (0..=days).rev() {
        let date = today - Duration::days(i);
        let fluctuation = (rand::random::<f64>() - 0.5) * 2.0 * volatility;
        let mut rate = pair_rate * (1.0 + fluctuation);
        if rate <= 0.0 {
            rate = pair_rate * 0.5;
        }

        data.push(HistoryPoint {
            date: date.format("%Y-%m-%d").to_string(),
            rate: format!("{rate:.6}"),
            timestamp: date.timestamp_millis(),
        });
    }

    HistoryResponse {
        base: base.to_string(),
        target: target.to_string(),
        period: period.to_string(),
        data,
        generated: today.to_rfc3339(),
    }
}
