//! Click repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;

use crate::store::{CategoryClicks, SourceClicks};

/// Repository for click events.
#[derive(Debug, Clone)]
pub struct ClickRepository {
    pool: PgPool,
}

impl ClickRepository {
    /// Create a new click repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Total clicks and distinct clicked items for one subscriber.
    pub async fn subscriber_click_counts(
        &self,
        subscriber_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(DISTINCT content_id) FROM clicks \
             WHERE subscriber_id = $1 AND clicked_at >= $2",
        )
        .bind(subscriber_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count subscriber clicks", e)
        })
    }

    /// Sources ranked by clicks on their items since `since`.
    pub async fn top_sources(&self, since: DateTime<Utc>, limit: u32) -> AppResult<Vec<SourceClicks>> {
        sqlx::query_as::<_, SourceClicks>(
            "SELECT src.id AS source_id, src.name, COUNT(c.id) AS clicks \
             FROM clicks c \
             JOIN content_items ci ON ci.id = c.content_id \
             JOIN sources src ON src.id = ci.source_id \
             WHERE c.clicked_at >= $1 \
             GROUP BY src.id, src.name \
             ORDER BY clicks DESC, src.name \
             LIMIT $2",
        )
        .bind(since)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rank sources", e))
    }

    /// Categories ranked by clicks on their items since `since`.
    pub async fn clicks_by_category(&self, since: DateTime<Utc>) -> AppResult<Vec<CategoryClicks>> {
        sqlx::query_as::<_, CategoryClicks>(
            "SELECT cat.id AS category_id, cat.name, COUNT(c.id) AS clicks \
             FROM clicks c \
             JOIN content_items ci ON ci.id = c.content_id \
             JOIN categories cat ON cat.id = ci.category_id \
             WHERE c.clicked_at >= $1 \
             GROUP BY cat.id, cat.name \
             ORDER BY clicks DESC, cat.name",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll up category clicks", e)
        })
    }

    /// Distinct active clickers and total click events since `since`.
    pub async fn reach_counts(&self, since: DateTime<Utc>) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
                COUNT(DISTINCT c.subscriber_id) FILTER (WHERE s.is_active), \
                COUNT(c.id) \
             FROM clicks c JOIN subscribers s ON s.id = c.subscriber_id \
             WHERE c.clicked_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count click reach", e))
    }
}
