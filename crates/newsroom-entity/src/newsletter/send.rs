//! Per-recipient delivery record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Delivery state of a single send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "send_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Queued,
    Sent,
    /// Accepted by the recipient's mail server.
    Delivered,
    Failed,
}

impl SendStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SendStatus {
    type Err = newsroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            "failed" => Ok(Self::Failed),
            _ => Err(newsroom_core::AppError::validation(format!(
                "Invalid send status: '{s}'"
            ))),
        }
    }
}

/// One newsletter delivered to one subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsletterSend {
    pub id: Uuid,
    /// Newsletter draft this send belongs to.
    pub newsletter_id: Uuid,
    /// Recipient.
    pub subscriber_id: Uuid,
    /// Delivery state.
    pub status: SendStatus,
    /// Hard or soft bounce reported by the mail provider.
    pub bounced: bool,
    /// When the send was dispatched.
    pub sent_at: DateTime<Utc>,
    /// First open; `None` if never opened.
    pub opened_at: Option<DateTime<Utc>>,
}

impl NewsletterSend {
    /// Whether the send reached the recipient's mailbox.
    pub fn is_delivered(&self) -> bool {
        self.status == SendStatus::Delivered
    }

    /// Whether the recipient opened the send.
    pub fn is_opened(&self) -> bool {
        self.opened_at.is_some()
    }
}
