//! Aggregate rows returned by [`FactStore`](super::FactStore) queries.
//!
//! Counts are `i64` to match PostgreSQL `COUNT(*)`. The analytics layer
//! converts them to rates.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use newsroom_entity::subscriber::RiskLevel;

/// Opens and clicks for one subscriber inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EngagementCounts {
    /// Sends opened in the window.
    pub opens: i64,
    /// All click events in the window.
    pub total_clicks: i64,
    /// Distinct content items clicked in the window.
    pub unique_clicks: i64,
}

/// Send outcomes inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DeliveryCounts {
    pub total: i64,
    pub delivered: i64,
    pub bounced: i64,
    /// Delivered sends with an open.
    pub opened: i64,
    /// Distinct subscribers who clicked anything from an in-window send.
    pub unique_clickers: i64,
}

/// Triage outcome of a source's content items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SourceContentCounts {
    pub total: i64,
    pub accepted: i64,
    /// Click events landing on the source's accepted items.
    pub accepted_clicks: i64,
}

/// Click volume attributed to one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SourceClicks {
    pub source_id: Uuid,
    pub name: String,
    pub clicks: i64,
}

/// Click volume attributed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CategoryClicks {
    pub category_id: Uuid,
    pub name: String,
    pub clicks: i64,
}

/// Audience and response for one newsletter issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NewsletterCounts {
    pub recipients: i64,
    pub opens: i64,
    /// All click events, not unique clickers.
    pub clicks: i64,
}

/// Subscriber and article reach inside a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReachCounts {
    /// Distinct active subscribers with an opened in-window send.
    pub openers: i64,
    /// Distinct active subscribers with an in-window click.
    pub clickers: i64,
    /// Content items sent in the window.
    pub articles_sent: i64,
    /// In-window sent items with at least one in-window click.
    pub articles_clicked: i64,
    /// All in-window click events.
    pub total_clicks: i64,
}

/// Number of active subscribers per stored risk level.
///
/// `risk_level` is `None` for subscribers the batch has not reached yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RiskLevelCount {
    pub risk_level: Option<RiskLevel>,
    pub subscribers: i64,
}

/// Active subscribers in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CountryGroup {
    pub country: String,
    pub country_name: Option<String>,
    pub subscribers: i64,
}

/// Send response for the active subscribers of one country.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CountryEngagement {
    pub sends: i64,
    pub opened: i64,
    pub unique_clickers: i64,
}

/// Active subscribers sharing a label (city, audience or company size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SegmentGroup {
    pub label: String,
    pub subscribers: i64,
    /// Mean stored engagement score of the group.
    pub avg_engagement: f64,
}
