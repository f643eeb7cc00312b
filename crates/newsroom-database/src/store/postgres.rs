//! PostgreSQL fact store delegating to the per-entity repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use newsroom_core::error::{AppError, ErrorKind};
use newsroom_core::result::AppResult;
use newsroom_entity::event::{NewSubscriberEvent, SubscriberEvent};
use newsroom_entity::newsletter::NewsletterDraft;
use newsroom_entity::subscriber::{RiskLevel, Subscriber};

use crate::repositories::{
    ClickRepository, ContentRepository, NewsletterRepository, SendRepository, SourceRepository,
    SubscriberEventRepository, SubscriberRepository,
};

use super::{
    CategoryClicks, CountryEngagement, CountryGroup, DeliveryCounts, EngagementCounts, FactStore,
    NewsletterCounts, ReachCounts, RiskLevelCount, SegmentGroup, SourceClicks,
    SourceContentCounts,
};

/// Fact store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFactStore {
    pool: PgPool,
    subscribers: SubscriberRepository,
    sends: SendRepository,
    clicks: ClickRepository,
    content: ContentRepository,
    sources: SourceRepository,
    newsletters: NewsletterRepository,
    events: SubscriberEventRepository,
}

impl PgFactStore {
    /// Create a fact store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            subscribers: SubscriberRepository::new(pool.clone()),
            sends: SendRepository::new(pool.clone()),
            clicks: ClickRepository::new(pool.clone()),
            content: ContentRepository::new(pool.clone()),
            sources: SourceRepository::new(pool.clone()),
            newsletters: NewsletterRepository::new(pool.clone()),
            events: SubscriberEventRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl FactStore for PgFactStore {
    async fn engagement_counts(
        &self,
        subscriber_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<EngagementCounts> {
        let opens = self.sends.count_opens_for_subscriber(subscriber_id, since).await?;
        let (total_clicks, unique_clicks) = self
            .clicks
            .subscriber_click_counts(subscriber_id, since)
            .await?;

        debug!(
            subscriber_id = %subscriber_id,
            opens,
            total_clicks,
            unique_clicks,
            "Loaded engagement counts"
        );

        Ok(EngagementCounts {
            opens,
            total_clicks,
            unique_clicks,
        })
    }

    async fn subscriber(&self, subscriber_id: Uuid) -> AppResult<Option<Subscriber>> {
        self.subscribers.find_by_id(subscriber_id).await
    }

    async fn active_subscriber_ids(&self) -> AppResult<Vec<Uuid>> {
        self.subscribers.find_active_ids().await
    }

    async fn count_active_subscribers(&self) -> AppResult<i64> {
        self.subscribers.count_active().await
    }

    async fn update_subscriber_engagement(
        &self,
        subscriber_id: Uuid,
        score: u32,
        risk_level: RiskLevel,
    ) -> AppResult<()> {
        let score = i32::try_from(score).map_err(|e| {
            AppError::with_source(ErrorKind::Validation, "Engagement score out of range", e)
        })?;
        self.subscribers
            .update_engagement(subscriber_id, score, risk_level)
            .await
    }

    async fn touch_last_engaged(&self, subscriber_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.subscribers.update_last_engaged(subscriber_id, at).await
    }

    async fn risk_level_counts(&self) -> AppResult<Vec<RiskLevelCount>> {
        self.subscribers.count_by_risk_level().await
    }

    async fn delivery_counts(&self, since: DateTime<Utc>) -> AppResult<DeliveryCounts> {
        let counts = self.sends.delivery_counts(since).await?;
        debug!(since = %since, total = counts.total, "Loaded delivery counts");
        Ok(counts)
    }

    async fn source_content_counts(&self, source_id: Uuid) -> AppResult<SourceContentCounts> {
        let (total, accepted) = self.content.source_triage_counts(source_id).await?;
        if total == 0 {
            return Ok(SourceContentCounts::default());
        }

        let accepted_clicks = if accepted == 0 {
            0
        } else {
            self.content.accepted_click_count(source_id).await?
        };

        Ok(SourceContentCounts {
            total,
            accepted,
            accepted_clicks,
        })
    }

    async fn source_name(&self, source_id: Uuid) -> AppResult<Option<String>> {
        Ok(self.sources.find_by_id(source_id).await?.map(|s| s.name))
    }

    async fn count_signups(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<i64> {
        self.subscribers.count_created_between(start, end).await
    }

    async fn count_unsubscribes(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        self.subscribers.count_deactivated_between(start, end).await
    }

    async fn top_sources_by_clicks(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> AppResult<Vec<SourceClicks>> {
        self.clicks.top_sources(since, limit).await
    }

    async fn category_clicks(&self, since: DateTime<Utc>) -> AppResult<Vec<CategoryClicks>> {
        self.clicks.clicks_by_category(since).await
    }

    async fn average_freshness_days(&self, since: DateTime<Utc>) -> AppResult<Option<f64>> {
        self.content.average_freshness_days(since).await
    }

    async fn recent_sent_newsletters(&self, limit: u32) -> AppResult<Vec<NewsletterDraft>> {
        self.newsletters.find_recent_sent(limit).await
    }

    async fn newsletter_counts(&self, newsletter_id: Uuid) -> AppResult<NewsletterCounts> {
        self.sends.newsletter_counts(newsletter_id).await
    }

    async fn send_exists(&self, send_id: Uuid) -> AppResult<bool> {
        self.sends.exists(send_id).await
    }

    async fn append_subscriber_event(
        &self,
        event: NewSubscriberEvent,
    ) -> AppResult<SubscriberEvent> {
        self.events.create(&event).await
    }

    async fn subscriber_events(&self, subscriber_id: Uuid) -> AppResult<Vec<SubscriberEvent>> {
        self.events.find_by_subscriber(subscriber_id).await
    }

    async fn reach_counts(&self, since: DateTime<Utc>) -> AppResult<ReachCounts> {
        let openers = self.sends.count_openers(since).await?;
        let (clickers, total_clicks) = self.clicks.reach_counts(since).await?;
        let (articles_sent, articles_clicked) = self.content.article_reach(since).await?;

        Ok(ReachCounts {
            openers,
            clickers,
            articles_sent,
            articles_clicked,
            total_clicks,
        })
    }

    async fn country_groups(&self) -> AppResult<Vec<CountryGroup>> {
        self.subscribers.group_by_country().await
    }

    async fn country_engagement(
        &self,
        country: &str,
        since: DateTime<Utc>,
    ) -> AppResult<CountryEngagement> {
        self.subscribers.country_engagement(country, since).await
    }

    async fn city_groups(&self, limit: u32) -> AppResult<Vec<SegmentGroup>> {
        self.subscribers.group_by_city(limit).await
    }

    async fn audience_groups(&self) -> AppResult<Vec<SegmentGroup>> {
        self.subscribers.group_by_audience().await
    }

    async fn company_size_groups(&self) -> AppResult<Vec<SegmentGroup>> {
        self.subscribers.group_by_company_size().await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ServiceUnavailable, "Fact store ping failed", e)
            })?;
        Ok(())
    }
}
