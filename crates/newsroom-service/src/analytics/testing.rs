//! Fact builders for component tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use newsroom_database::{FactStore, MemoryFactStore};
use newsroom_entity::click::Click;
use newsroom_entity::content::{Category, ContentItem, ContentStatus, Source};
use newsroom_entity::newsletter::{NewsletterDraft, NewsletterSend, NewsletterStatus, SendStatus};
use newsroom_entity::subscriber::{NewSubscriber, Subscriber};

/// A memory store plus helpers to seed it relative to a fixed `now`.
pub(crate) struct Fixture {
    pub memory: MemoryFactStore,
    pub now: DateTime<Utc>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            memory: MemoryFactStore::new(),
            now: Utc::now(),
        }
    }

    pub fn store(&self) -> Arc<dyn FactStore> {
        Arc::new(self.memory.clone())
    }

    pub fn days_ago(&self, days: i64) -> DateTime<Utc> {
        self.now - Duration::days(days)
    }

    pub async fn subscriber(&self) -> Uuid {
        self.subscriber_with(|_| {}).await
    }

    pub async fn subscriber_with<F>(&self, customize: F) -> Uuid
    where
        F: FnOnce(&mut Subscriber),
    {
        let mut subscriber = Subscriber::register(
            NewSubscriber {
                email: format!("{}@example.com", Uuid::new_v4()),
                ..Default::default()
            },
            self.days_ago(60),
        );
        customize(&mut subscriber);
        let id = subscriber.id;
        self.memory.insert_subscriber(subscriber).await;
        id
    }

    pub async fn newsletter(&self, subject: &str, sent_at: Option<DateTime<Utc>>) -> Uuid {
        let id = Uuid::new_v4();
        self.memory
            .insert_newsletter(NewsletterDraft {
                id,
                subject: subject.to_string(),
                status: if sent_at.is_some() {
                    NewsletterStatus::Sent
                } else {
                    NewsletterStatus::Draft
                },
                sent_at,
                created_at: sent_at.unwrap_or(self.now),
            })
            .await;
        id
    }

    /// A delivered send dispatched at `sent_at`, optionally opened.
    pub async fn send(
        &self,
        newsletter_id: Uuid,
        subscriber_id: Uuid,
        sent_at: DateTime<Utc>,
        opened_at: Option<DateTime<Utc>>,
    ) -> Uuid {
        self.send_with(newsletter_id, subscriber_id, sent_at, |s| s.opened_at = opened_at)
            .await
    }

    pub async fn send_with<F>(
        &self,
        newsletter_id: Uuid,
        subscriber_id: Uuid,
        sent_at: DateTime<Utc>,
        customize: F,
    ) -> Uuid
    where
        F: FnOnce(&mut NewsletterSend),
    {
        let mut send = NewsletterSend {
            id: Uuid::new_v4(),
            newsletter_id,
            subscriber_id,
            status: SendStatus::Delivered,
            bounced: false,
            sent_at,
            opened_at: None,
        };
        customize(&mut send);
        let id = send.id;
        self.memory.insert_send(send).await;
        id
    }

    pub async fn click(
        &self,
        subscriber_id: Uuid,
        send_id: Uuid,
        content_id: Uuid,
        clicked_at: DateTime<Utc>,
    ) {
        self.memory
            .insert_click(Click {
                id: Uuid::new_v4(),
                subscriber_id,
                send_id,
                content_id,
                clicked_at,
            })
            .await;
    }

    pub async fn source(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.memory
            .insert_source(Source {
                id,
                name: name.to_string(),
            })
            .await;
        id
    }

    pub async fn category(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.memory
            .insert_category(Category {
                id,
                name: name.to_string(),
            })
            .await;
        id
    }

    pub async fn content<F>(&self, customize: F) -> Uuid
    where
        F: FnOnce(&mut ContentItem),
    {
        let mut item = ContentItem {
            id: Uuid::new_v4(),
            title: "Untitled".to_string(),
            url: "https://example.com/article".to_string(),
            status: ContentStatus::Pending,
            source_id: None,
            category_id: None,
            published_at: None,
            sent_at: None,
            created_at: self.days_ago(90),
        };
        customize(&mut item);
        let id = item.id;
        self.memory.insert_content(item).await;
        id
    }
}
