//! Newsletter send repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;

use crate::store::{DeliveryCounts, NewsletterCounts};

/// Repository for per-recipient send records.
#[derive(Debug, Clone)]
pub struct SendRepository {
    pool: PgPool,
}

impl SendRepository {
    /// Create a new send repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Count sends to one subscriber opened since `since`.
    pub async fn count_opens_for_subscriber(
        &self,
        subscriber_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_sends \
             WHERE subscriber_id = $1 AND opened_at IS NOT NULL AND opened_at >= $2",
        )
        .bind(subscriber_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count opens", e))
    }

    /// Check whether a send exists.
    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM newsletter_sends WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to look up send", e))
    }

    /// Delivery outcomes of sends dispatched since `since`.
    pub async fn delivery_counts(&self, since: DateTime<Utc>) -> AppResult<DeliveryCounts> {
        sqlx::query_as::<_, DeliveryCounts>(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE status = 'delivered') AS delivered, \
                COUNT(*) FILTER (WHERE bounced) AS bounced, \
                COUNT(*) FILTER (WHERE status = 'delivered' AND opened_at IS NOT NULL) AS opened, \
                (SELECT COUNT(DISTINCT c.subscriber_id) FROM clicks c \
                    JOIN newsletter_sends cs ON cs.id = c.send_id \
                    WHERE cs.sent_at >= $1) AS unique_clickers \
             FROM newsletter_sends WHERE sent_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute delivery counts", e)
        })
    }

    /// Recipients, opens and click events for one newsletter.
    pub async fn newsletter_counts(&self, newsletter_id: Uuid) -> AppResult<NewsletterCounts> {
        sqlx::query_as::<_, NewsletterCounts>(
            "SELECT \
                COUNT(*) AS recipients, \
                COUNT(opened_at) AS opens, \
                (SELECT COUNT(*) FROM clicks c \
                    JOIN newsletter_sends cs ON cs.id = c.send_id \
                    WHERE cs.newsletter_id = $1) AS clicks \
             FROM newsletter_sends WHERE newsletter_id = $1",
        )
        .bind(newsletter_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to compute newsletter counts", e)
        })
    }

    /// Distinct active subscribers with an opened send dispatched since `since`.
    pub async fn count_openers(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT ns.subscriber_id) FROM newsletter_sends ns \
             JOIN subscribers s ON s.id = ns.subscriber_id \
             WHERE s.is_active = TRUE AND ns.sent_at >= $1 AND ns.opened_at IS NOT NULL",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count openers", e))
    }
}
