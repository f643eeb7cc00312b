//! Subscriber event entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::EventType;

/// An append-only lifecycle record. Rows are never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriberEvent {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    /// Event type as stored.
    pub event_type: String,
    /// Send that triggered the event, if any.
    pub newsletter_send_id: Option<Uuid>,
    /// JSON-serialized metadata blob.
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data required to append a subscriber event.
#[derive(Debug, Clone)]
pub struct NewSubscriberEvent {
    pub subscriber_id: Uuid,
    pub event_type: EventType,
    pub newsletter_send_id: Option<Uuid>,
    pub metadata: Option<String>,
}

impl SubscriberEvent {
    /// Materialize a new event row stamped with `now`.
    pub fn from_new(data: NewSubscriberEvent, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            subscriber_id: data.subscriber_id,
            event_type: data.event_type.as_str().to_string(),
            newsletter_send_id: data.newsletter_send_id,
            metadata: data.metadata,
            created_at: now,
        }
    }
}
