//! In-process fact store holding every fact table in memory.
//!
//! Mirrors the SQL semantics of [`PgFactStore`](super::PgFactStore): the
//! same windows, the same inner-join behavior for dangling references,
//! and the same ordering of ranked results. Used by tests and for running
//! the engine without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use newsroom_core::error::AppError;
use newsroom_core::result::AppResult;
use newsroom_entity::click::Click;
use newsroom_entity::content::{Category, ContentItem, ContentStatus, Source};
use newsroom_entity::event::{NewSubscriberEvent, SubscriberEvent};
use newsroom_entity::newsletter::{NewsletterDraft, NewsletterSend, NewsletterStatus};
use newsroom_entity::subscriber::{RiskLevel, Subscriber};

use super::{
    CategoryClicks, CountryEngagement, CountryGroup, DeliveryCounts, EngagementCounts, FactStore,
    NewsletterCounts, ReachCounts, RiskLevelCount, SegmentGroup, SourceClicks,
    SourceContentCounts,
};

#[derive(Debug, Default)]
struct Facts {
    subscribers: Vec<Subscriber>,
    newsletters: Vec<NewsletterDraft>,
    sends: Vec<NewsletterSend>,
    clicks: Vec<Click>,
    content: Vec<ContentItem>,
    sources: Vec<Source>,
    categories: Vec<Category>,
    events: Vec<SubscriberEvent>,
    /// Subscribers whose engagement update is forced to fail.
    failing_updates: HashSet<Uuid>,
}

impl Facts {
    fn active_subscriber(&self, id: Uuid) -> Option<&Subscriber> {
        self.subscribers.iter().find(|s| s.id == id && s.is_active)
    }

    fn has_subscriber(&self, id: Uuid) -> bool {
        self.subscribers.iter().any(|s| s.id == id)
    }

    fn has_send(&self, id: Uuid) -> bool {
        self.sends.iter().any(|s| s.id == id)
    }

    fn content_item(&self, id: Uuid) -> Option<&ContentItem> {
        self.content.iter().find(|c| c.id == id)
    }

    fn clicks_since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &Click> {
        self.clicks.iter().filter(move |c| c.clicked_at >= since)
    }

    /// Group active subscribers by a label, largest group first.
    fn segment_groups<F>(&self, label: F) -> Vec<SegmentGroup>
    where
        F: Fn(&Subscriber) -> Option<&String>,
    {
        let mut groups: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for subscriber in self.subscribers.iter().filter(|s| s.is_active) {
            if let Some(value) = label(subscriber) {
                let entry = groups.entry(value.clone()).or_default();
                entry.0 += 1;
                entry.1 += i64::from(subscriber.engagement_score);
            }
        }

        let mut rows: Vec<SegmentGroup> = groups
            .into_iter()
            .map(|(label, (count, score_sum))| SegmentGroup {
                label,
                subscribers: count,
                avg_engagement: score_sum as f64 / count as f64,
            })
            .collect();
        rows.sort_by(|a, b| b.subscribers.cmp(&a.subscribers).then_with(|| a.label.cmp(&b.label)));
        rows
    }
}

/// Fact store keeping all facts in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFactStore {
    facts: Arc<RwLock<Facts>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryFactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber.
    pub async fn insert_subscriber(&self, subscriber: Subscriber) {
        self.facts.write().await.subscribers.push(subscriber);
    }

    /// Add a newsletter draft.
    pub async fn insert_newsletter(&self, newsletter: NewsletterDraft) {
        self.facts.write().await.newsletters.push(newsletter);
    }

    /// Add a send record.
    pub async fn insert_send(&self, send: NewsletterSend) {
        self.facts.write().await.sends.push(send);
    }

    /// Add a click event.
    pub async fn insert_click(&self, click: Click) {
        self.facts.write().await.clicks.push(click);
    }

    /// Add a content item.
    pub async fn insert_content(&self, item: ContentItem) {
        self.facts.write().await.content.push(item);
    }

    /// Add a content source.
    pub async fn insert_source(&self, source: Source) {
        self.facts.write().await.sources.push(source);
    }

    /// Add a content category.
    pub async fn insert_category(&self, category: Category) {
        self.facts.write().await.categories.push(category);
    }

    /// Make every subsequent query fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make engagement updates for one subscriber fail.
    pub async fn fail_updates_for(&self, subscriber_id: Uuid) {
        self.facts.write().await.failing_updates.insert(subscriber_id);
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("Fact store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl FactStore for MemoryFactStore {
    async fn engagement_counts(
        &self,
        subscriber_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<EngagementCounts> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let opens = facts
            .sends
            .iter()
            .filter(|s| s.subscriber_id == subscriber_id)
            .filter(|s| s.opened_at.is_some_and(|at| at >= since))
            .count() as i64;

        let mut total_clicks = 0i64;
        let mut items = HashSet::new();
        for click in facts
            .clicks_since(since)
            .filter(|c| c.subscriber_id == subscriber_id)
        {
            total_clicks += 1;
            items.insert(click.content_id);
        }

        debug!(subscriber_id = %subscriber_id, opens, total_clicks, "Loaded engagement counts");

        Ok(EngagementCounts {
            opens,
            total_clicks,
            unique_clicks: items.len() as i64,
        })
    }

    async fn subscriber(&self, subscriber_id: Uuid) -> AppResult<Option<Subscriber>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts
            .subscribers
            .iter()
            .find(|s| s.id == subscriber_id)
            .cloned())
    }

    async fn active_subscriber_ids(&self) -> AppResult<Vec<Uuid>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        let mut active: Vec<&Subscriber> = facts.subscribers.iter().filter(|s| s.is_active).collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(active.into_iter().map(|s| s.id).collect())
    }

    async fn count_active_subscribers(&self) -> AppResult<i64> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts.subscribers.iter().filter(|s| s.is_active).count() as i64)
    }

    async fn update_subscriber_engagement(
        &self,
        subscriber_id: Uuid,
        score: u32,
        risk_level: RiskLevel,
    ) -> AppResult<()> {
        self.check_available()?;
        let mut facts = self.facts.write().await;
        if facts.failing_updates.contains(&subscriber_id) {
            return Err(AppError::database(format!(
                "Failed to update subscriber engagement for {subscriber_id}"
            )));
        }

        let score = i32::try_from(score)
            .map_err(|_| AppError::validation("Engagement score out of range"))?;
        if let Some(subscriber) = facts.subscribers.iter_mut().find(|s| s.id == subscriber_id) {
            subscriber.engagement_score = score;
            subscriber.risk_level = Some(risk_level);
            subscriber.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn touch_last_engaged(&self, subscriber_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.check_available()?;
        let mut facts = self.facts.write().await;
        if let Some(subscriber) = facts.subscribers.iter_mut().find(|s| s.id == subscriber_id) {
            subscriber.last_engaged_at = Some(at);
        }
        Ok(())
    }

    async fn risk_level_counts(&self) -> AppResult<Vec<RiskLevelCount>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut counts: HashMap<Option<RiskLevel>, i64> = HashMap::new();
        for subscriber in facts.subscribers.iter().filter(|s| s.is_active) {
            *counts.entry(subscriber.risk_level).or_default() += 1;
        }

        let order = RiskLevel::ALL.iter().copied().map(Some).chain([None]);
        Ok(order
            .filter_map(|level| {
                counts.get(&level).map(|&subscribers| RiskLevelCount {
                    risk_level: level,
                    subscribers,
                })
            })
            .collect())
    }

    async fn delivery_counts(&self, since: DateTime<Utc>) -> AppResult<DeliveryCounts> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut counts = DeliveryCounts::default();
        let mut window_sends = HashSet::new();
        for send in facts.sends.iter().filter(|s| s.sent_at >= since) {
            counts.total += 1;
            counts.delivered += i64::from(send.is_delivered());
            counts.bounced += i64::from(send.bounced);
            counts.opened += i64::from(send.is_delivered() && send.is_opened());
            window_sends.insert(send.id);
        }

        let clickers: HashSet<Uuid> = facts
            .clicks
            .iter()
            .filter(|c| window_sends.contains(&c.send_id))
            .map(|c| c.subscriber_id)
            .collect();
        counts.unique_clickers = clickers.len() as i64;

        Ok(counts)
    }

    async fn source_content_counts(&self, source_id: Uuid) -> AppResult<SourceContentCounts> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let items: Vec<&ContentItem> = facts
            .content
            .iter()
            .filter(|c| c.source_id == Some(source_id))
            .collect();
        if items.is_empty() {
            return Ok(SourceContentCounts::default());
        }

        let accepted: HashSet<Uuid> = items
            .iter()
            .filter(|c| c.status == ContentStatus::Accepted)
            .map(|c| c.id)
            .collect();
        let accepted_clicks = facts
            .clicks
            .iter()
            .filter(|c| accepted.contains(&c.content_id))
            .count() as i64;

        Ok(SourceContentCounts {
            total: items.len() as i64,
            accepted: accepted.len() as i64,
            accepted_clicks,
        })
    }

    async fn source_name(&self, source_id: Uuid) -> AppResult<Option<String>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts
            .sources
            .iter()
            .find(|s| s.id == source_id)
            .map(|s| s.name.clone()))
    }

    async fn count_signups(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<i64> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts
            .subscribers
            .iter()
            .filter(|s| s.created_at >= start && s.created_at < end)
            .count() as i64)
    }

    async fn count_unsubscribes(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts
            .subscribers
            .iter()
            .filter(|s| !s.is_active && s.updated_at >= start && s.updated_at < end)
            .count() as i64)
    }

    async fn top_sources_by_clicks(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> AppResult<Vec<SourceClicks>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut clicks: HashMap<Uuid, i64> = HashMap::new();
        for click in facts.clicks_since(since) {
            if let Some(source_id) = facts.content_item(click.content_id).and_then(|c| c.source_id) {
                *clicks.entry(source_id).or_default() += 1;
            }
        }

        let mut rows: Vec<SourceClicks> = facts
            .sources
            .iter()
            .filter_map(|source| {
                clicks.get(&source.id).map(|&clicks| SourceClicks {
                    source_id: source.id,
                    name: source.name.clone(),
                    clicks,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.name.cmp(&b.name)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn category_clicks(&self, since: DateTime<Utc>) -> AppResult<Vec<CategoryClicks>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut clicks: HashMap<Uuid, i64> = HashMap::new();
        for click in facts.clicks_since(since) {
            if let Some(category_id) = facts.content_item(click.content_id).and_then(|c| c.category_id)
            {
                *clicks.entry(category_id).or_default() += 1;
            }
        }

        let mut rows: Vec<CategoryClicks> = facts
            .categories
            .iter()
            .filter_map(|category| {
                clicks.get(&category.id).map(|&clicks| CategoryClicks {
                    category_id: category.id,
                    name: category.name.clone(),
                    clicks,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.clicks.cmp(&a.clicks).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn average_freshness_days(&self, since: DateTime<Utc>) -> AppResult<Option<f64>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let delays: Vec<f64> = facts
            .content
            .iter()
            .filter(|c| c.sent_at.is_some_and(|at| at >= since))
            .filter_map(ContentItem::freshness_days)
            .collect();

        if delays.is_empty() {
            return Ok(None);
        }
        Ok(Some(delays.iter().sum::<f64>() / delays.len() as f64))
    }

    async fn recent_sent_newsletters(&self, limit: u32) -> AppResult<Vec<NewsletterDraft>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut sent: Vec<NewsletterDraft> = facts
            .newsletters
            .iter()
            .filter(|n| n.status == NewsletterStatus::Sent)
            .cloned()
            .collect();
        // NULLS LAST: `None` sorts below any `Some` under reversed ordering.
        sent.sort_by(|a, b| {
            b.sent_at
                .cmp(&a.sent_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        sent.truncate(limit as usize);
        Ok(sent)
    }

    async fn newsletter_counts(&self, newsletter_id: Uuid) -> AppResult<NewsletterCounts> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut counts = NewsletterCounts::default();
        let mut send_ids = HashSet::new();
        for send in facts.sends.iter().filter(|s| s.newsletter_id == newsletter_id) {
            counts.recipients += 1;
            counts.opens += i64::from(send.is_opened());
            send_ids.insert(send.id);
        }
        counts.clicks = facts
            .clicks
            .iter()
            .filter(|c| send_ids.contains(&c.send_id))
            .count() as i64;

        Ok(counts)
    }

    async fn send_exists(&self, send_id: Uuid) -> AppResult<bool> {
        self.check_available()?;
        Ok(self.facts.read().await.has_send(send_id))
    }

    async fn append_subscriber_event(
        &self,
        event: NewSubscriberEvent,
    ) -> AppResult<SubscriberEvent> {
        self.check_available()?;
        let mut facts = self.facts.write().await;
        if !facts.has_subscriber(event.subscriber_id) {
            return Err(AppError::database(format!(
                "Subscriber {} does not exist",
                event.subscriber_id
            )));
        }

        if let Some(send_id) = event
            .newsletter_send_id
            .filter(|id| !facts.has_send(*id))
        {
            return Err(AppError::database(format!(
                "Newsletter send {send_id} does not exist"
            )));
        }

        let row = SubscriberEvent::from_new(event, Utc::now());
        facts.events.push(row.clone());
        Ok(row)
    }

    async fn subscriber_events(&self, subscriber_id: Uuid) -> AppResult<Vec<SubscriberEvent>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts
            .events
            .iter()
            .filter(|e| e.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }

    async fn reach_counts(&self, since: DateTime<Utc>) -> AppResult<ReachCounts> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let openers: HashSet<Uuid> = facts
            .sends
            .iter()
            .filter(|s| s.sent_at >= since && s.is_opened())
            .filter(|s| facts.active_subscriber(s.subscriber_id).is_some())
            .map(|s| s.subscriber_id)
            .collect();

        let mut clickers = HashSet::new();
        let mut total_clicks = 0i64;
        for click in facts.clicks_since(since) {
            if !facts.has_subscriber(click.subscriber_id) {
                continue;
            }
            total_clicks += 1;
            if facts.active_subscriber(click.subscriber_id).is_some() {
                clickers.insert(click.subscriber_id);
            }
        }

        let sent: Vec<&ContentItem> = facts
            .content
            .iter()
            .filter(|c| c.sent_at.is_some_and(|at| at >= since))
            .collect();
        let articles_clicked = sent
            .iter()
            .filter(|item| {
                facts
                    .clicks_since(since)
                    .any(|click| click.content_id == item.id)
            })
            .count() as i64;

        Ok(ReachCounts {
            openers: openers.len() as i64,
            clickers: clickers.len() as i64,
            articles_sent: sent.len() as i64,
            articles_clicked,
            total_clicks,
        })
    }

    async fn country_groups(&self) -> AppResult<Vec<CountryGroup>> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let mut groups: BTreeMap<String, (Option<String>, i64)> = BTreeMap::new();
        for subscriber in facts.subscribers.iter().filter(|s| s.is_active) {
            if let Some(country) = &subscriber.country {
                let entry = groups.entry(country.clone()).or_default();
                entry.1 += 1;
                // MAX(country_name)
                if subscriber.country_name > entry.0 {
                    entry.0 = subscriber.country_name.clone();
                }
            }
        }

        let mut rows: Vec<CountryGroup> = groups
            .into_iter()
            .map(|(country, (country_name, subscribers))| CountryGroup {
                country,
                country_name,
                subscribers,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.subscribers
                .cmp(&a.subscribers)
                .then_with(|| a.country.cmp(&b.country))
        });
        Ok(rows)
    }

    async fn country_engagement(
        &self,
        country: &str,
        since: DateTime<Utc>,
    ) -> AppResult<CountryEngagement> {
        self.check_available()?;
        let facts = self.facts.read().await;

        let in_country = |id: Uuid| {
            facts
                .active_subscriber(id)
                .is_some_and(|s| s.country.as_deref() == Some(country))
        };

        let mut counts = CountryEngagement::default();
        for send in facts
            .sends
            .iter()
            .filter(|s| s.sent_at >= since && in_country(s.subscriber_id))
        {
            counts.sends += 1;
            counts.opened += i64::from(send.is_opened());
        }

        let clickers: HashSet<Uuid> = facts
            .clicks_since(since)
            .filter(|c| in_country(c.subscriber_id))
            .map(|c| c.subscriber_id)
            .collect();
        counts.unique_clickers = clickers.len() as i64;

        Ok(counts)
    }

    async fn city_groups(&self, limit: u32) -> AppResult<Vec<SegmentGroup>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        let mut rows = facts.segment_groups(|s| s.city.as_ref());
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn audience_groups(&self) -> AppResult<Vec<SegmentGroup>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts.segment_groups(|s| s.audience.as_ref()))
    }

    async fn company_size_groups(&self) -> AppResult<Vec<SegmentGroup>> {
        self.check_available()?;
        let facts = self.facts.read().await;
        Ok(facts.segment_groups(|s| s.company_size.as_ref()))
    }

    async fn ping(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("Fact store unavailable"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use newsroom_core::error::ErrorKind;
    use newsroom_entity::event::EventType;
    use newsroom_entity::newsletter::SendStatus;
    use newsroom_entity::subscriber::NewSubscriber;

    fn subscriber(email: &str, now: DateTime<Utc>) -> Subscriber {
        Subscriber::register(
            NewSubscriber {
                email: email.to_string(),
                ..Default::default()
            },
            now,
        )
    }

    fn newsletter(subject: &str, sent_at: Option<DateTime<Utc>>) -> NewsletterDraft {
        NewsletterDraft {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            status: NewsletterStatus::Sent,
            sent_at,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recent_sent_newsletters_newest_first_nulls_last() {
        let store = MemoryFactStore::new();
        let now = Utc::now();
        store.insert_newsletter(newsletter("unsent date", None)).await;
        store
            .insert_newsletter(newsletter("older", Some(now - Duration::days(7))))
            .await;
        store.insert_newsletter(newsletter("newer", Some(now))).await;
        let mut draft = newsletter("draft", None);
        draft.status = NewsletterStatus::Draft;
        store.insert_newsletter(draft).await;

        let subjects: Vec<String> = store
            .recent_sent_newsletters(10)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.subject)
            .collect();
        assert_eq!(subjects, vec!["newer", "older", "unsent date"]);
    }

    #[tokio::test]
    async fn test_event_send_reference_must_exist() {
        let store = MemoryFactStore::new();
        let reader = subscriber("reader@example.com", Utc::now());
        let reader_id = reader.id;
        store.insert_subscriber(reader).await;
        let issue = newsletter("Weekly", Some(Utc::now()));
        let issue_id = issue.id;
        store.insert_newsletter(issue).await;
        let send_id = Uuid::new_v4();
        store
            .insert_send(NewsletterSend {
                id: send_id,
                newsletter_id: issue_id,
                subscriber_id: reader_id,
                status: SendStatus::Delivered,
                bounced: false,
                sent_at: Utc::now(),
                opened_at: None,
            })
            .await;

        let event = |send: Uuid| NewSubscriberEvent {
            subscriber_id: reader_id,
            event_type: EventType::Opened,
            newsletter_send_id: Some(send),
            metadata: None,
        };

        assert!(store.send_exists(send_id).await.unwrap());
        assert!(!store.send_exists(Uuid::new_v4()).await.unwrap());
        assert!(store.append_subscriber_event(event(send_id)).await.is_ok());
        let err = store
            .append_subscriber_event(event(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(store.subscriber_events(reader_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_engagement_update_leaves_last_engaged_alone() {
        let store = MemoryFactStore::new();
        let now = Utc::now();
        let sub = subscriber("reader@example.com", now);
        let id = sub.id;
        store.insert_subscriber(sub).await;

        store.touch_last_engaged(id, now).await.unwrap();
        store
            .update_subscriber_engagement(id, 42, RiskLevel::Active)
            .await
            .unwrap();

        let stored = store.subscriber(id).await.unwrap().unwrap();
        assert_eq!(stored.engagement_score, 42);
        assert_eq!(stored.risk_level, Some(RiskLevel::Active));
        assert_eq!(stored.last_engaged_at, Some(now));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_instead_of_returning_zero() {
        let store = MemoryFactStore::new();
        store.set_unavailable(true);

        let err = store.count_active_subscribers().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert_eq!(store.count_active_subscribers().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_groups_skip_missing_labels() {
        let store = MemoryFactStore::new();
        let now = Utc::now();

        let mut berlin = subscriber("a@example.com", now);
        berlin.city = Some("Berlin".into());
        berlin.engagement_score = 40;
        let mut berlin_two = subscriber("b@example.com", now);
        berlin_two.city = Some("Berlin".into());
        berlin_two.engagement_score = 21;
        let nowhere = subscriber("c@example.com", now);
        let mut gone = subscriber("d@example.com", now);
        gone.city = Some("Paris".into());
        gone.is_active = false;

        for s in [berlin, berlin_two, nowhere, gone] {
            store.insert_subscriber(s).await;
        }

        let cities = store.city_groups(20).await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].label, "Berlin");
        assert_eq!(cities[0].subscribers, 2);
        assert!((cities[0].avg_engagement - 30.5).abs() < f64::EPSILON);
    }
}
