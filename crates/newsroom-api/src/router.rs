//! Route definitions for the Newsroom HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to handlers via Axum's `State` extractor.

use axum::Router;
use axum::routing::{get, post};

use crate::handlers;
use crate::state::AppState;

/// Build the API router without outer middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(analytics_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Liveness and store reachability.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Analytics reports, the risk batch trigger and event ingestion.
fn analytics_routes() -> Router<AppState> {
    use handlers::analytics as a;

    Router::new()
        .route(
            "/analytics/subscribers/{id}/engagement",
            get(a::subscriber_engagement),
        )
        .route("/analytics/risk/recompute", post(a::recompute_risk))
        .route("/analytics/risk/distribution", get(a::risk_distribution))
        .route("/analytics/health", get(a::system_health))
        .route(
            "/analytics/sources/{id}/reliability",
            get(a::source_reliability),
        )
        .route("/analytics/growth", get(a::growth))
        .route("/analytics/content", get(a::content_intelligence))
        .route("/analytics/newsletters", get(a::compare_newsletters))
        .route("/analytics/events", post(a::track_event))
        .route("/analytics/overview", get(a::overview))
        .route("/analytics/audience", get(a::audience))
}
