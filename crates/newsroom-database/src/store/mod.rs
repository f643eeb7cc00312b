//! The fact store query interface consumed by the analytics engine.
//!
//! Every analytics computation is expressed in terms of the aggregate
//! queries below. Windows are inclusive lower bounds (`since`); range
//! queries take half-open `[start, end)` intervals.

pub mod aggregate;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_entity::event::{NewSubscriberEvent, SubscriberEvent};
use newsroom_entity::newsletter::NewsletterDraft;
use newsroom_entity::subscriber::{RiskLevel, Subscriber};

pub use aggregate::{
    CategoryClicks, CountryEngagement, CountryGroup, DeliveryCounts, EngagementCounts,
    NewsletterCounts, ReachCounts, RiskLevelCount, SegmentGroup, SourceClicks,
    SourceContentCounts,
};
pub use memory::MemoryFactStore;
pub use postgres::PgFactStore;

/// Read and write access to the raw analytics facts.
///
/// Implementations must be thread-safe. A failed query is always an
/// error; implementations never substitute zeros for unavailable data.
#[async_trait]
pub trait FactStore: Send + Sync + std::fmt::Debug + 'static {
    /// Opens, click events and distinct clicked items for one subscriber.
    async fn engagement_counts(
        &self,
        subscriber_id: Uuid,
        since: DateTime<Utc>,
    ) -> AppResult<EngagementCounts>;

    /// Find one subscriber.
    async fn subscriber(&self, subscriber_id: Uuid) -> AppResult<Option<Subscriber>>;

    /// IDs of every active subscriber.
    async fn active_subscriber_ids(&self) -> AppResult<Vec<Uuid>>;

    /// Number of active subscribers.
    async fn count_active_subscribers(&self) -> AppResult<i64>;

    /// Overwrite the derived score and tier of one subscriber.
    ///
    /// Touches `engagement_score`, `risk_level` and `updated_at` only.
    async fn update_subscriber_engagement(
        &self,
        subscriber_id: Uuid,
        score: u32,
        risk_level: RiskLevel,
    ) -> AppResult<()>;

    /// Set `last_engaged_at` of one subscriber. No other column changes.
    async fn touch_last_engaged(&self, subscriber_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Active subscribers grouped by stored risk level.
    async fn risk_level_counts(&self) -> AppResult<Vec<RiskLevelCount>>;

    /// Outcome counts for sends dispatched since `since`.
    async fn delivery_counts(&self, since: DateTime<Utc>) -> AppResult<DeliveryCounts>;

    /// Triage counts and accepted-item clicks for one source.
    async fn source_content_counts(&self, source_id: Uuid) -> AppResult<SourceContentCounts>;

    /// Display name of a source.
    async fn source_name(&self, source_id: Uuid) -> AppResult<Option<String>>;

    /// Subscribers created in `[start, end)`.
    async fn count_signups(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<i64>;

    /// Inactive subscribers last updated in `[start, end)`.
    async fn count_unsubscribes(&self, start: DateTime<Utc>, end: DateTime<Utc>)
    -> AppResult<i64>;

    /// Sources ranked by clicks since `since`, most clicked first.
    async fn top_sources_by_clicks(
        &self,
        since: DateTime<Utc>,
        limit: u32,
    ) -> AppResult<Vec<SourceClicks>>;

    /// Categories ranked by clicks since `since`, most clicked first.
    async fn category_clicks(&self, since: DateTime<Utc>) -> AppResult<Vec<CategoryClicks>>;

    /// Mean days between publication and send for items sent since
    /// `since`. `None` when no item qualifies.
    async fn average_freshness_days(&self, since: DateTime<Utc>) -> AppResult<Option<f64>>;

    /// Most recently sent newsletters, newest first.
    async fn recent_sent_newsletters(&self, limit: u32) -> AppResult<Vec<NewsletterDraft>>;

    /// Recipients, opens and click events of one newsletter.
    async fn newsletter_counts(&self, newsletter_id: Uuid) -> AppResult<NewsletterCounts>;

    /// Whether a newsletter send with this ID exists.
    async fn send_exists(&self, send_id: Uuid) -> AppResult<bool>;

    /// Append one event row and return it as stored.
    async fn append_subscriber_event(&self, event: NewSubscriberEvent)
    -> AppResult<SubscriberEvent>;

    /// Events of one subscriber, oldest first.
    async fn subscriber_events(&self, subscriber_id: Uuid) -> AppResult<Vec<SubscriberEvent>>;

    /// Subscriber and article reach since `since`.
    async fn reach_counts(&self, since: DateTime<Utc>) -> AppResult<ReachCounts>;

    /// Active subscribers per non-null country, largest first.
    async fn country_groups(&self) -> AppResult<Vec<CountryGroup>>;

    /// Send response of one country's active subscribers since `since`.
    async fn country_engagement(
        &self,
        country: &str,
        since: DateTime<Utc>,
    ) -> AppResult<CountryEngagement>;

    /// Largest non-null cities by active subscriber count.
    async fn city_groups(&self, limit: u32) -> AppResult<Vec<SegmentGroup>>;

    /// Active subscribers per non-null audience segment.
    async fn audience_groups(&self) -> AppResult<Vec<SegmentGroup>>;

    /// Active subscribers per non-null company size bucket.
    async fn company_size_groups(&self) -> AppResult<Vec<SegmentGroup>>;

    /// Check that the store answers queries.
    async fn ping(&self) -> AppResult<()>;
}
