//! Durable copy of the last fetched exchange rates.
//!
//! Serves only the degraded path: when a live refresh fails, the most
//! recently persisted snapshot is rebuilt from this table.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use redb::{Database, ReadableTable, TableDefinition};

use crate::core::currency::types::StoredRate;
use crate::shared::error::StoreError;

const RATES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("currency_rates");
const LAST_UPDATED_KEY: &str = "__last_updated";

pub struct RateStore {
    db: Database,
}

impl RateStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Persist a full snapshot in one transaction. Keys are target currency
    /// codes; the base is implicit (single-base design).
    pub fn save_rates(
        &self,
        _base: &str,
        rates: &HashMap<String, f64>,
        fetched_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        {
            let mut table = txn
                .open_table(RATES_TABLE)
                .map_err(|e| StoreError::Database(e.to_string()))?;

            let snapshot_ts = fetched_at.timestamp();
            for (code, rate) in rates {
                let payload = StoredRate {
                    rate: *rate,
                    updated_at: snapshot_ts,
                };
                let serialized = serde_json::to_string(&payload)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                table
                    .insert(code.as_str(), serialized.as_str())
                    .map_err(|e| StoreError::Database(e.to_string()))?;
            }

            let ts_string = snapshot_ts.to_string();
            table
                .insert(LAST_UPDATED_KEY, ts_string.as_str())
                .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Database(e.to_string()))
    }

    /// The most recently persisted rate table, or None if nothing was ever
    /// saved.
    pub fn latest_rates(
        &self,
    ) -> Result<Option<(HashMap<String, f64>, DateTime<Utc>)>, StoreError> {
        let mut rates = HashMap::new();
        let mut last_updated: Option<DateTime<Utc>> = None;

        let txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if let Ok(table) = txn.open_table(RATES_TABLE) {
            for entry in table
                .iter()
                .map_err(|e| StoreError::Database(e.to_string()))?
            {
                let (key, value) = entry.map_err(|e| StoreError::Database(e.to_string()))?;
                let code = key.value();
                let val = value.value();

                if code == LAST_UPDATED_KEY {
                    if let Ok(parsed) = val.parse::<i64>() {
                        last_updated = Utc.timestamp_opt(parsed, 0).single();
                    }
                    continue;
                }

                if let Ok(stored) = serde_json::from_str::<StoredRate>(val) {
                    rates.insert(code.to_string(), stored.rate);
                    last_updated =
                        last_updated.or_else(|| Utc.timestamp_opt(stored.updated_at, 0).single());
                }
            }
        }

        if rates.is_empty() {
            return Ok(None);
        }
        Ok(Some((rates, last_updated.unwrap_or_else(Utc::now))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (RateStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RateStore::open(&dir.path().join("rates.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_empty_store_has_no_rates() {
        let (store, _dir) = open_temp();
        assert!(store.latest_rates().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_snapshot() {
        let (store, _dir) = open_temp();
        let fetched_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let mut rates = HashMap::new();
        rates.insert("EUR".to_string(), 0.85);
        rates.insert("GBP".to_string(), 0.73);
        store.save_rates("USD", &rates, fetched_at).unwrap();

        let (loaded, ts) = store.latest_rates().unwrap().unwrap();
        assert_eq!(loaded["EUR"], 0.85);
        assert_eq!(loaded["GBP"], 0.73);
        assert_eq!(ts, fetched_at);
    }

    #[test]
    fn test_later_snapshot_overwrites() {
        let (store, _dir) = open_temp();

        let mut first = HashMap::new();
        first.insert("EUR".to_string(), 0.85);
        store.save_rates("USD", &first, Utc::now()).unwrap();

        let mut second = HashMap::new();
        second.insert("EUR".to_string(), 0.9);
        store.save_rates("USD", &second, Utc::now()).unwrap();

        let (loaded, _) = store.latest_rates().unwrap().unwrap();
        assert_eq!(loaded["EUR"], 0.9);
    }
}
