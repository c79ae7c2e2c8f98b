use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All rates are quoted against this base; it is always present in a snapshot
/// with a rate of 1.
pub const BASE_CURRENCY: &str = "USD";

/// An immutable, wholesale-replaced copy of the rate table plus its fetch
/// timestamp. `fallback` marks snapshots rebuilt from persisted rates after a
/// failed refresh.
#[derive(Debug, Clone, Serialize)]
pub struct RateSnapshot {
    pub base: String,
    pub rates: HashMap<String, f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_false")]
    pub fallback: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Payload from the exchangerate-api latest-rates endpoint. A response
/// without a `rates` field is malformed and fails deserialization.
#[derive(Debug, Deserialize)]
pub struct RatesApiResponse {
    pub rates: HashMap<String, f64>,
    #[serde(default)]
    pub time_last_updated: Option<i64>,
}

/// Value stored per currency code in the rates database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRate {
    pub rate: f64,
    pub updated_at: i64,
}
