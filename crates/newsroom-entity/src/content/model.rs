//! Content item entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Editorial triage state of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "content_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    /// Awaiting review.
    Pending,
    /// Selected for inclusion.
    Accepted,
    /// Rejected by an editor.
    Discarded,
}

impl ContentStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Discarded => "discarded",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = newsroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "discarded" => Ok(Self::Discarded),
            _ => Err(newsroom_core::AppError::validation(format!(
                "Invalid content status: '{s}'. Expected one of: pending, accepted, discarded"
            ))),
        }
    }
}

/// An article or link considered for a newsletter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub status: ContentStatus,
    /// Originating source, if known.
    pub source_id: Option<Uuid>,
    /// Editorial category, if assigned.
    pub category_id: Option<Uuid>,
    /// Original publication time at the source.
    pub published_at: Option<DateTime<Utc>>,
    /// When the item went out in a newsletter.
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Days between publication and inclusion in a newsletter.
    ///
    /// `None` unless both timestamps are known.
    pub fn freshness_days(&self) -> Option<f64> {
        let published = self.published_at?;
        let sent = self.sent_at?;
        Some((sent - published).num_seconds() as f64 / 86_400.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_freshness_requires_both_timestamps() {
        let now = Utc::now();
        let mut item = ContentItem {
            id: Uuid::new_v4(),
            title: "Rust 2024".into(),
            url: "https://example.com/rust".into(),
            status: ContentStatus::Accepted,
            source_id: None,
            category_id: None,
            published_at: Some(now - Duration::hours(36)),
            sent_at: None,
            created_at: now,
        };
        assert!(item.freshness_days().is_none());

        item.sent_at = Some(now);
        let days = item.freshness_days().unwrap();
        assert!((days - 1.5).abs() < 1e-9);
    }
}
