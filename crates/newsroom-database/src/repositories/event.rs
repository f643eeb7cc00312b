//! Subscriber event repository implementation.
//!
//! The log is append-only: this repository exposes no update or delete.

use sqlx::PgPool;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;
use newsroom_entity::event::{NewSubscriberEvent, SubscriberEvent};

/// Repository for subscriber lifecycle events.
#[derive(Debug, Clone)]
pub struct SubscriberEventRepository {
    pool: PgPool,
}

impl SubscriberEventRepository {
    /// Create a new subscriber event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an event row.
    pub async fn create(&self, data: &NewSubscriberEvent) -> AppResult<SubscriberEvent> {
        sqlx::query_as::<_, SubscriberEvent>(
            "INSERT INTO subscriber_events (subscriber_id, event_type, newsletter_send_id, metadata) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(data.subscriber_id)
        .bind(data.event_type.as_str())
        .bind(data.newsletter_send_id)
        .bind(&data.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record subscriber event", e)
        })
    }

    /// List one subscriber's events, oldest first.
    pub async fn find_by_subscriber(&self, subscriber_id: Uuid) -> AppResult<Vec<SubscriberEvent>> {
        sqlx::query_as::<_, SubscriberEvent>(
            "SELECT * FROM subscriber_events WHERE subscriber_id = $1 ORDER BY created_at, id",
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list subscriber events", e)
        })
    }
}
