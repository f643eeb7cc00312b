//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use newsroom_core::error::AppError;
use newsroom_entity::event::EventType;

/// Body of `POST /api/analytics/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
    pub subscriber_id: Uuid,
    /// One of `opened`, `clicked`, `subscribed`, `unsubscribed`, `bounced`,
    /// `complained`.
    pub event_type: String,
    #[serde(default)]
    pub newsletter_send_id: Option<Uuid>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl TrackEventRequest {
    /// Parse the event type, rejecting unknown values.
    pub fn event_type(&self) -> Result<EventType, AppError> {
        self.event_type.parse()
    }
}
