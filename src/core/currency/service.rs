//! Time-boxed cache in front of the remote exchange rate API.
//!
//! The snapshot is replaced wholesale on every successful fetch and served
//! without an outbound call while it is within the TTL. A failed refresh
//! degrades to the most recently persisted rates instead of surfacing a hard
//! failure; only a cold cache with no persisted data reports an error.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::shared::error::CurrencyError;
use crate::shared::settings::CurrencySettings;
use crate::store::rates::RateStore;

use super::types::{RateSnapshot, RatesApiResponse, BASE_CURRENCY};

/// Source of the live rate table. The HTTP implementation is swapped for a
/// scripted one in tests.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch(&self) -> Result<HashMap<String, f64>, CurrencyError>;
}

/// Time source, injected so cache expiry is testable with a fake clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fetches the USD-based rate table over HTTP with a request timeout.
pub struct HttpRateProvider {
    http: Client,
    url: String,
}

impl HttpRateProvider {
    pub fn new(settings: &CurrencySettings) -> Result<Self, CurrencyError> {
        let http = Client::builder()
            .user_agent("convertscope/rates")
            .timeout(StdDuration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| CurrencyError::Network(e.to_string()))?;

        Ok(Self {
            http,
            url: settings.effective_api_url(),
        })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch(&self) -> Result<HashMap<String, f64>, CurrencyError> {
        debug!("fetching exchange rates from {}", self.url);
        let resp = self.http.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(CurrencyError::Network(format!(
                "rates endpoint returned {}",
                resp.status()
            )));
        }

        let payload: RatesApiResponse = resp
            .json()
            .await
            .map_err(|e| CurrencyError::InvalidPayload(e.to_string()))?;

        Ok(payload.rates)
    }
}

pub struct RateService {
    provider: Arc<dyn RateProvider>,
    clock: Arc<dyn Clock>,
    store: Arc<RateStore>,
    ttl: Duration,
    snapshot: Mutex<Option<RateSnapshot>>,
}

impl RateService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        clock: Arc<dyn Clock>,
        store: Arc<RateStore>,
        ttl_secs: i64,
    ) -> Self {
        Self {
            provider,
            clock,
            store,
            ttl: Duration::seconds(ttl_secs),
            snapshot: Mutex::new(None),
        }
    }

    /// Current rate table. Serves the cached snapshot inside the TTL, fetches
    /// once when cold, and degrades to persisted rates on fetch failure.
    /// Performs no internal retry; retry policy belongs to the caller.
    pub async fn rates(&self) -> Result<RateSnapshot, CurrencyError> {
        let now = self.clock.now();

        if let Some(snapshot) = self.cached(now) {
            return Ok(snapshot);
        }

        match self.provider.fetch().await {
            Ok(mut rates) => {
                rates.insert(BASE_CURRENCY.to_string(), 1.0);

                // Write-through so a later degraded read has data. A failed
                // persist is not fatal to serving the fresh snapshot.
                if let Err(e) = self.store.save_rates(BASE_CURRENCY, &rates, now) {
                    warn!("failed to persist exchange rates: {e}");
                }

                let snapshot = RateSnapshot {
                    base: BASE_CURRENCY.to_string(),
                    rates,
                    timestamp: now,
                    fallback: false,
                };
                self.replace(snapshot.clone());
                info!("exchange rates refreshed ({} currencies)", snapshot.rates.len());
                Ok(snapshot)
            }
            Err(err) => {
                warn!("rate refresh failed: {err}; falling back to stored rates");
                match self.store.latest_rates()? {
                    Some((rates, fetched_at)) if !rates.is_empty() => Ok(RateSnapshot {
                        base: BASE_CURRENCY.to_string(),
                        rates,
                        timestamp: fetched_at,
                        fallback: true,
                    }),
                    _ => Err(CurrencyError::RatesUnavailable),
                }
            }
        }
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<RateSnapshot> {
        let guard = self.snapshot.lock().ok()?;
        guard
            .as_ref()
            .filter(|snapshot| now - snapshot.timestamp < self.ttl)
            .cloned()
    }

    fn replace(&self, snapshot: RateSnapshot) {
        if let Ok(mut guard) = self.snapshot.lock() {
            *guard = Some(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        rates: Option<HashMap<String, f64>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn succeeding(pairs: &[(&str, f64)]) -> Self {
            Self {
                rates: Some(pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                rates: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for ScriptedProvider {
        async fn fetch(&self) -> Result<HashMap<String, f64>, CurrencyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.rates {
                Some(rates) => Ok(rates.clone()),
                None => Err(CurrencyError::Network("connection refused".to_string())),
            }
        }
    }

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }

        fn advance(&self, secs: i64) {
            let mut guard = self.now.lock().unwrap();
            *guard += Duration::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn empty_store() -> Arc<RateStore> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.redb");
        let store = RateStore::open(&path).unwrap();
        // Leak the tempdir so the database file outlives the test body.
        std::mem::forget(dir);
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_warm_cache_makes_no_outbound_call() {
        let provider = Arc::new(ScriptedProvider::succeeding(&[("EUR", 0.85)]));
        let clock = Arc::new(ManualClock::new());
        let service = RateService::new(provider.clone(), clock.clone(), empty_store(), 300);

        let first = service.rates().await.unwrap();
        assert!(!first.fallback);
        assert_eq!(provider.call_count(), 1);

        clock.advance(299);
        let second = service.rates().await.unwrap();
        assert_eq!(second.rates["EUR"], 0.85);
        assert_eq!(provider.call_count(), 1, "warm read must not refetch");
    }

    #[tokio::test]
    async fn test_expired_cache_fetches_exactly_once() {
        let provider = Arc::new(ScriptedProvider::succeeding(&[("EUR", 0.85)]));
        let clock = Arc::new(ManualClock::new());
        let service = RateService::new(provider.clone(), clock.clone(), empty_store(), 300);

        service.rates().await.unwrap();
        clock.advance(300);
        service.rates().await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_base_currency_always_present() {
        let provider = Arc::new(ScriptedProvider::succeeding(&[("EUR", 0.85)]));
        let service = RateService::new(provider, Arc::new(SystemClock), empty_store(), 300);

        let snapshot = service.rates().await.unwrap();
        assert_eq!(snapshot.rates["USD"], 1.0);
        assert_eq!(snapshot.base, "USD");
    }

    #[tokio::test]
    async fn test_fallback_serves_persisted_rates() {
        let store = empty_store();
        let mut persisted = HashMap::new();
        persisted.insert("EUR".to_string(), 0.9);
        store.save_rates("USD", &persisted, Utc::now()).unwrap();

        let provider = Arc::new(ScriptedProvider::failing());
        let service = RateService::new(provider.clone(), Arc::new(SystemClock), store, 300);

        let snapshot = service.rates().await.unwrap();
        assert!(snapshot.fallback);
        assert_eq!(snapshot.rates["EUR"], 0.9);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_cold_cache_without_persisted_rates_fails() {
        let provider = Arc::new(ScriptedProvider::failing());
        let service = RateService::new(provider, Arc::new(SystemClock), empty_store(), 300);

        let err = service.rates().await.unwrap_err();
        assert!(matches!(err, CurrencyError::RatesUnavailable));
    }

    #[tokio::test]
    async fn test_successful_fetch_writes_through_to_store() {
        let store = empty_store();
        let provider = Arc::new(ScriptedProvider::succeeding(&[("GBP", 0.73)]));
        let service = RateService::new(provider, Arc::new(SystemClock), store.clone(), 300);

        service.rates().await.unwrap();

        let (rates, _) = store.latest_rates().unwrap().expect("rates persisted");
        assert_eq!(rates["GBP"], 0.73);
        assert_eq!(rates["USD"], 1.0);
    }
}
