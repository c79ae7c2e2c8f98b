//! Route handlers. Thin wrappers over the core engine, rate service, and
//! record stores; all conversion math lives in `core`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::core::currency::{self, RateSnapshot};
use crate::core::history::{self, HistoryResponse};
use crate::core::units;
use crate::shared::types::{ConversionRecord, FavoriteRecord, NewConversion, NewFavorite};
use crate::state::AppState;

use super::error::ApiError;

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/exchange-rates
pub async fn exchange_rates(
    State(state): State<AppState>,
) -> Result<Json<RateSnapshot>, ApiError> {
    let snapshot = state.rate_service.rates().await?;
    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "7d".to_string()
}

/// GET /api/currency-history/{base}/{target}?period=
///
/// Pair rate comes from the live snapshot when resolvable; otherwise a seeded
/// fallback keeps the endpoint serving data.
pub async fn currency_history(
    State(state): State<AppState>,
    Path((base, target)): Path<(String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let base = base.to_uppercase();
    let target = target.to_uppercase();

    let pair_rate = match state.rate_service.rates().await {
        Ok(snapshot) => currency::convert_currency(1.0, &base, &target, &snapshot.rates)
            .unwrap_or_else(|_| history::fallback_pair_rate(&base, &target)),
        Err(_) => history::fallback_pair_rate(&base, &target),
    };

    Ok(Json(history::generate_history(
        &base,
        &target,
        &query.period,
        pair_rate,
    )))
}

/// POST /api/conversions
pub async fn save_conversion(
    State(state): State<AppState>,
    Json(new): Json<NewConversion>,
) -> Result<(StatusCode, Json<ConversionRecord>), ApiError> {
    // Reject categories the registry does not know about; unit ids are not
    // checked since currency pairs are stored with currency codes.
    if units::Category::from_id(&new.category).is_none() {
        return Err(ApiError::bad_request(format!(
            "unknown category: {}",
            new.category
        )));
    }

    let record = state.store.save_conversion(new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /api/conversions/recent?limit=
pub async fn recent_conversions(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ConversionRecord>>, ApiError> {
    let records = state.store.recent_conversions(query.limit)?;
    Ok(Json(records))
}

/// POST /api/favorites — 409 on a duplicate (from, to, category) triple.
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(new): Json<NewFavorite>,
) -> Result<(StatusCode, Json<FavoriteRecord>), ApiError> {
    let record = state.store.add_favorite(new)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/favorites
pub async fn list_favorites(
    State(state): State<AppState>,
) -> Result<Json<Vec<FavoriteRecord>>, ApiError> {
    Ok(Json(state.store.favorites()?))
}

/// DELETE /api/favorites/{id}
pub async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.remove_favorite(id)?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/units — static registry for clients that do not bundle it.
pub async fn list_units() -> impl IntoResponse {
    Json(json!({
        "categories": units::Category::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>(),
        "units": units::all_units(),
    }))
}
