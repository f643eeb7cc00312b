//! Newsletter draft entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of a newsletter draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "newsletter_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NewsletterStatus {
    /// Still being edited.
    Draft,
    /// Delivered to the send queue.
    Sent,
}

impl NewsletterStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
        }
    }
}

impl fmt::Display for NewsletterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NewsletterStatus {
    type Err = newsroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            _ => Err(newsroom_core::AppError::validation(format!(
                "Invalid newsletter status: '{s}'. Expected one of: draft, sent"
            ))),
        }
    }
}

/// A composed newsletter issue.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsletterDraft {
    /// Unique newsletter identifier.
    pub id: Uuid,
    /// Email subject line.
    pub subject: String,
    /// Lifecycle state.
    pub status: NewsletterStatus,
    /// When the issue went out; `None` for drafts.
    pub sent_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
