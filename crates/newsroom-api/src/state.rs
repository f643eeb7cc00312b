//! Shared application state threaded through every handler.

use std::sync::Arc;

use newsroom_core::config::AppConfig;
use newsroom_service::AnalyticsEngine;

/// State handed to Axum handlers via the `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Config ───────────────────────────────────────────────────
    /// Application configuration.
    pub config: Arc<AppConfig>,

    // ── Analytics ────────────────────────────────────────────────
    /// The analytics engine over the configured fact store.
    pub engine: AnalyticsEngine,
}

impl AppState {
    /// Bundle configuration and engine.
    pub fn new(config: AppConfig, engine: AnalyticsEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
