use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use convertscope::api;
use convertscope::core::currency::{HttpRateProvider, RateService, SystemClock};
use convertscope::shared::settings::AppSettings;
use convertscope::state::AppState;
use convertscope::store::{MemStore, RateStore};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = AppSettings::load().await.unwrap_or_else(|e| {
        warn!("failed to load settings: {e}; using defaults");
        AppSettings::default()
    });

    let rate_store = Arc::new(RateStore::open(&settings.rates_db_path()?)?);
    let provider = Arc::new(HttpRateProvider::new(&settings.currency)?);
    let rate_service = Arc::new(RateService::new(
        provider,
        Arc::new(SystemClock),
        rate_store,
        settings.currency.cache_ttl_secs,
    ));
    let store = Arc::new(MemStore::new());

    let app = api::router(AppState::new(rate_service, store));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("convertscope listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
