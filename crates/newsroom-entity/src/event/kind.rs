//! Subscriber event type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a subscriber lifecycle event.
///
/// Stored as plain text in `subscriber_events.event_type`, so the column
/// accepts values written by other producers. The engine only writes the
/// variants below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Opened,
    Clicked,
    Subscribed,
    Unsubscribed,
    Bounced,
    Complained,
}

impl EventType {
    /// Return the event type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Clicked => "clicked",
            Self::Subscribed => "subscribed",
            Self::Unsubscribed => "unsubscribed",
            Self::Bounced => "bounced",
            Self::Complained => "complained",
        }
    }

    /// Whether the event moves `last_engaged_at`.
    pub fn is_engagement(&self) -> bool {
        matches!(self, Self::Opened | Self::Clicked)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventType {
    type Err = newsroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opened" => Ok(Self::Opened),
            "clicked" => Ok(Self::Clicked),
            "subscribed" => Ok(Self::Subscribed),
            "unsubscribed" => Ok(Self::Unsubscribed),
            "bounced" => Ok(Self::Bounced),
            "complained" => Ok(Self::Complained),
            _ => Err(newsroom_core::AppError::validation(format!(
                "Invalid event type: '{s}'. Expected one of: opened, clicked, \
                 subscribed, unsubscribed, bounced, complained"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_opens_and_clicks_are_engagement() {
        assert!(EventType::Opened.is_engagement());
        assert!(EventType::Clicked.is_engagement());
        assert!(!EventType::Subscribed.is_engagement());
        assert!(!EventType::Unsubscribed.is_engagement());
        assert!(!EventType::Bounced.is_engagement());
        assert!(!EventType::Complained.is_engagement());
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("CLICKED".parse::<EventType>().unwrap(), EventType::Clicked);
        assert!("forwarded".parse::<EventType>().is_err());
    }
}
