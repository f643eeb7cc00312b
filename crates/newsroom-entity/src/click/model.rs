//! Click entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One link click on a content item inside a send.
///
/// Repeated clicks on the same item by the same subscriber are separate
/// rows; unique-click metrics count distinct `content_id` values.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Click {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub send_id: Uuid,
    pub content_id: Uuid,
    pub clicked_at: DateTime<Utc>,
}
