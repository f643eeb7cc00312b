//! Analytics report handlers.
//!
//! Window and limit parameters are resolved against the analytics
//! configuration before the engine is called, so out-of-range values come
//! back as 400s without touching the fact store.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use newsroom_core::types::ReportParams;
use newsroom_entity::event::SubscriberEvent;
use newsroom_service::analytics::{
    AudienceBreakdown, ComprehensiveOverview, ContentIntelligence, EngagementBreakdown,
    GrowthPoint, HealthScore, NewsletterPerformance, RiskBatchSummary, RiskDistribution,
    SourceReliability,
};

use crate::dto::request::TrackEventRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// GET /api/analytics/subscribers/{id}/engagement
pub async fn subscriber_engagement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<EngagementBreakdown> {
    let breakdown = state.engine.engagement_breakdown(id).await?;
    Ok(Json(ApiResponse::ok(breakdown)))
}

/// POST /api/analytics/risk/recompute
pub async fn recompute_risk(State(state): State<AppState>) -> ApiResult<RiskBatchSummary> {
    let summary = state.engine.recompute_risk().await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// GET /api/analytics/risk/distribution
pub async fn risk_distribution(State(state): State<AppState>) -> ApiResult<RiskDistribution> {
    let distribution = state.engine.risk_distribution().await?;
    Ok(Json(ApiResponse::ok(distribution)))
}

/// GET /api/analytics/health?days=
pub async fn system_health(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<HealthScore> {
    let window = params.window(state.engine.config())?;
    let health = state.engine.health(window).await?;
    Ok(Json(ApiResponse::ok(health)))
}

/// GET /api/analytics/sources/{id}/reliability
pub async fn source_reliability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<SourceReliability> {
    let details = state.engine.source_reliability_details(id).await?;
    Ok(Json(ApiResponse::ok(details)))
}

/// GET /api/analytics/growth?days=
pub async fn growth(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Vec<GrowthPoint>> {
    let window = params.window(state.engine.config())?;
    let series = state.engine.growth(window.len_days()).await?;
    Ok(Json(ApiResponse::ok(series)))
}

/// GET /api/analytics/content?days=
pub async fn content_intelligence(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<ContentIntelligence> {
    let window = params.window(state.engine.config())?;
    let report = state.engine.content_intelligence(window).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/analytics/newsletters?limit=
pub async fn compare_newsletters(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<Vec<NewsletterPerformance>> {
    let limit = params.limit(state.engine.config())?;
    let rows = state.engine.compare_newsletters(limit).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/analytics/events
pub async fn track_event(
    State(state): State<AppState>,
    Json(req): Json<TrackEventRequest>,
) -> ApiResult<SubscriberEvent> {
    let event_type = req.event_type()?;
    let event = state
        .engine
        .track_event(
            req.subscriber_id,
            event_type,
            req.newsletter_send_id,
            req.metadata,
        )
        .await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// GET /api/analytics/overview?days=
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<ComprehensiveOverview> {
    let window = params.window(state.engine.config())?;
    let report = state.engine.overview(window).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/analytics/audience?days=
pub async fn audience(
    State(state): State<AppState>,
    Query(params): Query<ReportParams>,
) -> ApiResult<AudienceBreakdown> {
    let window = params.window(state.engine.config())?;
    let report = state.engine.audience(window).await?;
    Ok(Json(ApiResponse::ok(report)))
}
