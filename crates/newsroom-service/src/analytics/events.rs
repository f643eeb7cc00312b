//! Subscriber event tracking.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use newsroom_core::error::AppError;
use newsroom_core::result::AppResult;
use newsroom_database::FactStore;
use newsroom_entity::event::{EventType, NewSubscriberEvent, SubscriberEvent};

/// Appends subscriber events and keeps `last_engaged_at` current.
#[derive(Debug, Clone)]
pub struct EventTracker {
    store: Arc<dyn FactStore>,
}

impl EventTracker {
    /// Create a new event tracker.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Record one event.
    ///
    /// Opens and clicks also move the subscriber's `last_engaged_at` to the
    /// event's timestamp. Past events are never modified.
    pub async fn track(
        &self,
        subscriber_id: Uuid,
        event_type: EventType,
        newsletter_send_id: Option<Uuid>,
        metadata: Option<Value>,
    ) -> AppResult<SubscriberEvent> {
        if self.store.subscriber(subscriber_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Subscriber {subscriber_id} not found"
            )));
        }

        if let Some(send_id) = newsletter_send_id {
            if !self.store.send_exists(send_id).await? {
                return Err(AppError::not_found(format!(
                    "Newsletter send {send_id} not found"
                )));
            }
        }

        let metadata = metadata.map(|m| serde_json::to_string(&m)).transpose()?;
        let event = self
            .store
            .append_subscriber_event(NewSubscriberEvent {
                subscriber_id,
                event_type,
                newsletter_send_id,
                metadata,
            })
            .await?;

        if event_type.is_engagement() {
            self.store
                .touch_last_engaged(subscriber_id, event.created_at)
                .await?;
        }

        info!(
            subscriber_id = %subscriber_id,
            event_type = %event_type,
            event_id = %event.id,
            "Tracked subscriber event"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;
    use newsroom_core::error::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_events_are_appended_and_never_changed() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let tracker = EventTracker::new(fx.store());

        let kinds = [
            EventType::Subscribed,
            EventType::Opened,
            EventType::Clicked,
            EventType::Bounced,
            EventType::Opened,
        ];
        let mut recorded = Vec::new();
        for kind in kinds {
            recorded.push(tracker.track(reader, kind, None, None).await.unwrap());
        }

        let stored = fx.memory.subscriber_events(reader).await.unwrap();
        assert_eq!(stored.len(), kinds.len());
        for (before, after) in recorded.iter().zip(&stored) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.event_type, after.event_type);
            assert_eq!(before.created_at, after.created_at);
            assert_eq!(before.metadata, after.metadata);
        }
    }

    #[tokio::test]
    async fn test_last_engaged_follows_latest_open_or_click() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let tracker = EventTracker::new(fx.store());

        let click = tracker
            .track(reader, EventType::Clicked, None, None)
            .await
            .unwrap();
        let subscriber = fx.memory.subscriber(reader).await.unwrap().unwrap();
        assert_eq!(subscriber.last_engaged_at, Some(click.created_at));

        for kind in [
            EventType::Subscribed,
            EventType::Unsubscribed,
            EventType::Bounced,
            EventType::Complained,
        ] {
            tracker.track(reader, kind, None, None).await.unwrap();
        }
        let subscriber = fx.memory.subscriber(reader).await.unwrap().unwrap();
        assert_eq!(subscriber.last_engaged_at, Some(click.created_at));

        let open = tracker
            .track(reader, EventType::Opened, None, None)
            .await
            .unwrap();
        let subscriber = fx.memory.subscriber(reader).await.unwrap().unwrap();
        assert_eq!(subscriber.last_engaged_at, Some(open.created_at));
    }

    #[tokio::test]
    async fn test_non_engagement_events_leave_last_engaged_unset() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let tracker = EventTracker::new(fx.store());

        tracker
            .track(reader, EventType::Subscribed, None, None)
            .await
            .unwrap();
        let subscriber = fx.memory.subscriber(reader).await.unwrap().unwrap();
        assert_eq!(subscriber.last_engaged_at, None);
    }

    #[tokio::test]
    async fn test_metadata_is_serialized() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Issue", Some(fx.days_ago(1))).await;
        let send = fx.send(issue, reader, fx.days_ago(1), None).await;
        let tracker = EventTracker::new(fx.store());

        let event = tracker
            .track(
                reader,
                EventType::Clicked,
                Some(send),
                Some(json!({"link": "https://example.com", "position": 2})),
            )
            .await
            .unwrap();

        assert_eq!(event.newsletter_send_id, Some(send));
        let metadata: Value = serde_json::from_str(event.metadata.as_deref().unwrap()).unwrap();
        assert_eq!(metadata["position"], 2);
    }

    #[tokio::test]
    async fn test_unknown_subscriber_is_not_found() {
        let fx = Fixture::new();
        let tracker = EventTracker::new(fx.store());
        let err = tracker
            .track(Uuid::new_v4(), EventType::Opened, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_send_is_not_found() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let tracker = EventTracker::new(fx.store());
        let err = tracker
            .track(reader, EventType::Opened, Some(Uuid::new_v4()), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(fx.memory.subscriber_events(reader).await.unwrap().is_empty());
    }
}
