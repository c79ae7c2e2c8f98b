use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

use super::handlers;

/// Build the API router. CORS is wide open; the backend serves a static
/// client from another origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/exchange-rates", get(handlers::exchange_rates))
        .route(
            "/api/currency-history/{base}/{target}",
            get(handlers::currency_history),
        )
        .route(
            "/api/conversions",
            post(handlers::save_conversion).get(handlers::recent_conversions),
        )
        // Alias kept for clients that fetch /conversions/recent
        .route("/api/conversions/recent", get(handlers::recent_conversions))
        .route(
            "/api/favorites",
            post(handlers::add_favorite).get(handlers::list_favorites),
        )
        .route("/api/favorites/{id}", delete(handlers::delete_favorite))
        .route("/api/units", get(handlers::list_units))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
