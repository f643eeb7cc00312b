//! # newsroom-api
//!
//! Axum HTTP layer exposing every analytics operation as JSON under
//! `/api`. Handlers are thin: they resolve query parameters against the
//! analytics configuration, call the [`AnalyticsEngine`](newsroom_service::AnalyticsEngine)
//! and wrap the result in the `{ "success": true, "data": ... }` envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use state::AppState;
