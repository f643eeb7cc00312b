//! Subscriber entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::risk::RiskLevel;

/// A newsletter subscriber.
///
/// `engagement_score`, `risk_level` and `last_engaged_at` are derived
/// columns. The first two are overwritten wholesale by the risk batch;
/// the last is set by the event tracker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscriber {
    /// Unique subscriber identifier.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// `false` once the subscriber has unsubscribed.
    pub is_active: bool,
    /// Last computed engagement score (0-100).
    pub engagement_score: i32,
    /// Last computed risk tier, `None` until the first batch run.
    pub risk_level: Option<RiskLevel>,
    /// Most recent open/click event.
    pub last_engaged_at: Option<DateTime<Utc>>,
    /// ISO country code.
    pub country: Option<String>,
    /// Human-readable country name.
    pub country_name: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Audience segment label.
    pub audience: Option<String>,
    /// Company size bucket label.
    pub company_size: Option<String>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a subscriber.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSubscriber {
    pub email: String,
    pub country: Option<String>,
    pub country_name: Option<String>,
    pub city: Option<String>,
    pub audience: Option<String>,
    pub company_size: Option<String>,
}

impl Subscriber {
    /// Build a freshly registered subscriber.
    pub fn register(data: NewSubscriber, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: data.email,
            is_active: true,
            engagement_score: 0,
            risk_level: None,
            last_engaged_at: None,
            country: data.country,
            country_name: data.country_name,
            city: data.city,
            audience: data.audience,
            company_size: data.company_size,
            created_at: now,
            updated_at: now,
        }
    }
}
