//! Facade wiring every analytics component over one fact store.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use newsroom_core::config::AnalyticsConfig;
use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;
use newsroom_entity::event::{EventType, SubscriberEvent};

use super::{
    AudienceAggregator, AudienceBreakdown, ComprehensiveOverview, ContentIntelligence,
    ContentIntelligenceReporter, EngagementBreakdown, EngagementScorer, EventTracker, GrowthPoint,
    GrowthReporter, HealthScore, HealthScorer, NewsletterComparator, NewsletterPerformance,
    OverviewAggregator, RiskBatchSummary, RiskClassifier, RiskDistribution, SourceReliability,
    SourceReliabilityScorer,
};

/// Entry point to every analytics operation.
///
/// Cheap to clone; all components share the same store.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    store: Arc<dyn FactStore>,
    config: Arc<AnalyticsConfig>,
    engagement: EngagementScorer,
    risk: RiskClassifier,
    health: HealthScorer,
    sources: SourceReliabilityScorer,
    growth: GrowthReporter,
    content: ContentIntelligenceReporter,
    newsletters: NewsletterComparator,
    events: EventTracker,
    overview: OverviewAggregator,
    audience: AudienceAggregator,
}

impl AnalyticsEngine {
    /// Build every component over `store`.
    pub fn new(store: Arc<dyn FactStore>, config: &AnalyticsConfig) -> Self {
        let engagement = EngagementScorer::new(store.clone(), config.engagement_window_days);
        let risk = RiskClassifier::new(
            store.clone(),
            engagement.clone(),
            config.risk_batch_concurrency,
        );
        let sources = SourceReliabilityScorer::new(store.clone());
        let content = ContentIntelligenceReporter::new(
            store.clone(),
            sources.clone(),
            config.top_sources_limit,
        );
        let newsletters = NewsletterComparator::new(store.clone());
        let overview = OverviewAggregator::new(
            store.clone(),
            content.clone(),
            newsletters.clone(),
            config.overview_newsletter_limit,
        );

        Self {
            health: HealthScorer::new(store.clone()),
            growth: GrowthReporter::new(store.clone()),
            events: EventTracker::new(store.clone()),
            audience: AudienceAggregator::new(store.clone(), config.top_cities_limit),
            config: Arc::new(config.clone()),
            store,
            engagement,
            risk,
            sources,
            content,
            newsletters,
            overview,
        }
    }

    /// Analytics settings the engine was built with.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Check that the fact store answers.
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Engagement score of one subscriber.
    pub async fn engagement_score(&self, subscriber_id: Uuid) -> AppResult<u32> {
        self.engagement.score(subscriber_id).await
    }

    /// Engagement score of one subscriber with its inputs.
    pub async fn engagement_breakdown(&self, subscriber_id: Uuid) -> AppResult<EngagementBreakdown> {
        self.engagement.breakdown(subscriber_id).await
    }

    /// Rescore and reclassify every active subscriber.
    pub async fn recompute_risk(&self) -> AppResult<RiskBatchSummary> {
        self.risk.recompute_all().await
    }

    /// Stored risk tier counts.
    pub async fn risk_distribution(&self) -> AppResult<RiskDistribution> {
        self.risk.distribution().await
    }

    /// System health over the window.
    pub async fn health(&self, window: ReportWindow) -> AppResult<HealthScore> {
        self.health.health(window).await
    }

    /// Reliability score of one source.
    pub async fn source_reliability(&self, source_id: Uuid) -> AppResult<u32> {
        self.sources.reliability(source_id).await
    }

    /// Reliability score of one source with its inputs.
    pub async fn source_reliability_details(&self, source_id: Uuid) -> AppResult<SourceReliability> {
        self.sources.details(source_id).await
    }

    /// Daily growth series of `days` days ending today.
    pub async fn growth(&self, days: u32) -> AppResult<Vec<GrowthPoint>> {
        self.growth.growth(days).await
    }

    /// Content intelligence report over the window.
    pub async fn content_intelligence(&self, window: ReportWindow) -> AppResult<ContentIntelligence> {
        self.content.report(window).await
    }

    /// Up to `limit` most recently sent newsletters with their performance.
    pub async fn compare_newsletters(&self, limit: u32) -> AppResult<Vec<NewsletterPerformance>> {
        self.newsletters.compare(limit).await
    }

    /// Record a subscriber event.
    pub async fn track_event(
        &self,
        subscriber_id: Uuid,
        event_type: EventType,
        newsletter_send_id: Option<Uuid>,
        metadata: Option<Value>,
    ) -> AppResult<SubscriberEvent> {
        self.events
            .track(subscriber_id, event_type, newsletter_send_id, metadata)
            .await
    }

    /// Comprehensive overview over the window.
    pub async fn overview(&self, window: ReportWindow) -> AppResult<ComprehensiveOverview> {
        self.overview.overview(window).await
    }

    /// Location and audience breakdown over the window.
    pub async fn audience(&self, window: ReportWindow) -> AppResult<AudienceBreakdown> {
        self.audience.breakdown(window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;

    #[tokio::test]
    async fn test_engine_end_to_end_on_empty_store() {
        let fx = Fixture::new();
        let engine = AnalyticsEngine::new(fx.store(), &AnalyticsConfig::default());
        let window = ReportWindow::days(30);

        engine.ping().await.unwrap();
        assert_eq!(engine.engagement_score(Uuid::new_v4()).await.unwrap(), 0);
        assert_eq!(engine.recompute_risk().await.unwrap().processed, 0);
        assert_eq!(engine.health(window).await.unwrap().score, 0);
        assert_eq!(engine.source_reliability(Uuid::new_v4()).await.unwrap(), 0);
        assert_eq!(engine.growth(30).await.unwrap().len(), 30);
        assert_eq!(engine.content_intelligence(window).await.unwrap().avg_freshness_days, 0);
        assert!(engine.compare_newsletters(10).await.unwrap().is_empty());
        assert_eq!(engine.overview(window).await.unwrap().newsletters.count, 0);
        assert_eq!(engine.audience(window).await.unwrap().total_active, 0);
    }

    #[tokio::test]
    async fn test_risk_batch_keeps_tracked_engagement_time() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Issue", Some(fx.days_ago(1))).await;
        fx.send(issue, reader, fx.days_ago(1), Some(fx.days_ago(1))).await;

        let engine = AnalyticsEngine::new(fx.store(), &AnalyticsConfig::default());
        engine
            .track_event(reader, EventType::Opened, None, None)
            .await
            .unwrap();
        engine.recompute_risk().await.unwrap();

        let stored = fx.memory.subscriber(reader).await.unwrap().unwrap();
        assert_eq!(stored.engagement_score, 1);
        assert!(stored.last_engaged_at.is_some());
        assert_eq!(engine.risk_distribution().await.unwrap().churned, 1);
    }
}
