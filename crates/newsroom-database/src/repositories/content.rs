//! Content item repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;

/// Repository for curated content items.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Create a new content repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Total and accepted item counts for one source.
    pub async fn source_triage_counts(&self, source_id: Uuid) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'accepted') \
             FROM content_items WHERE source_id = $1",
        )
        .bind(source_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count source content", e)
        })
    }

    /// Click events on one source's accepted items.
    pub async fn accepted_click_count(&self, source_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(c.id) FROM clicks c \
             JOIN content_items ci ON ci.id = c.content_id \
             WHERE ci.source_id = $1 AND ci.status = 'accepted'",
        )
        .bind(source_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count accepted clicks", e)
        })
    }

    /// Mean publish-to-send delay in days for items sent since `since`.
    pub async fn average_freshness_days(&self, since: DateTime<Utc>) -> AppResult<Option<f64>> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(EXTRACT(EPOCH FROM (sent_at - published_at)) / 86400.0)::FLOAT8 \
             FROM content_items \
             WHERE sent_at IS NOT NULL AND sent_at >= $1 AND published_at IS NOT NULL",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute content freshness", e)
        })
    }

    /// Items sent since `since`, and how many of them were clicked since then.
    pub async fn article_reach(&self, since: DateTime<Utc>) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
                COUNT(*), \
                COUNT(*) FILTER (WHERE EXISTS ( \
                    SELECT 1 FROM clicks c WHERE c.content_id = ci.id AND c.clicked_at >= $1)) \
             FROM content_items ci \
             WHERE ci.sent_at IS NOT NULL AND ci.sent_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count article reach", e)
        })
    }
}
