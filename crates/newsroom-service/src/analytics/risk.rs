//! Risk classification batch.
//!
//! Scores every active subscriber and overwrites the stored score and
//! tier. The batch is not transactional: a failure stops it, leaving the
//! subscribers already processed updated and the rest stale. Rerunning is
//! safe because each subscriber's result depends only on its own facts.

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_database::FactStore;
use newsroom_entity::subscriber::RiskLevel;

use super::engagement::EngagementScorer;

/// Outcome of one risk batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBatchSummary {
    /// Subscribers scored and written.
    pub processed: u64,
    pub active: u64,
    pub at_risk: u64,
    pub churned: u64,
    pub dormant: u64,
}

impl RiskBatchSummary {
    fn record(&mut self, level: RiskLevel) {
        self.processed += 1;
        match level {
            RiskLevel::Active => self.active += 1,
            RiskLevel::AtRisk => self.at_risk += 1,
            RiskLevel::Churned => self.churned += 1,
            RiskLevel::Dormant => self.dormant += 1,
        }
    }
}

/// Stored tier counts across active subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub active: i64,
    pub at_risk: i64,
    pub churned: i64,
    pub dormant: i64,
    /// Active subscribers the batch has not classified yet.
    pub unclassified: i64,
}

impl RiskDistribution {
    /// Sum of every bucket.
    pub fn total(&self) -> i64 {
        self.active + self.at_risk + self.churned + self.dormant + self.unclassified
    }
}

/// Classifies subscribers into risk tiers and persists the result.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    store: Arc<dyn FactStore>,
    scorer: EngagementScorer,
    concurrency: usize,
}

impl RiskClassifier {
    /// Create a classifier scoring up to `concurrency` subscribers at once.
    pub fn new(store: Arc<dyn FactStore>, scorer: EngagementScorer, concurrency: usize) -> Self {
        Self {
            store,
            scorer,
            concurrency: concurrency.max(1),
        }
    }

    /// Rescore and reclassify every active subscriber.
    pub async fn recompute_all(&self) -> AppResult<RiskBatchSummary> {
        let started = Instant::now();
        let subscriber_ids = self.store.active_subscriber_ids().await?;

        info!(
            subscribers = subscriber_ids.len(),
            concurrency = self.concurrency,
            "Starting risk classification batch"
        );

        let mut summary = RiskBatchSummary::default();
        let mut results = stream::iter(subscriber_ids)
            .map(|id| self.recompute_one(id))
            .buffer_unordered(self.concurrency);

        while let Some(result) = results.next().await {
            match result {
                Ok(level) => summary.record(level),
                Err(e) => {
                    error!(
                        processed = summary.processed,
                        error = %e,
                        "Risk classification batch aborted"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            processed = summary.processed,
            active = summary.active,
            at_risk = summary.at_risk,
            churned = summary.churned,
            dormant = summary.dormant,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Risk classification batch completed"
        );

        Ok(summary)
    }

    /// Rescore one subscriber and persist its score and tier.
    pub async fn recompute_one(&self, subscriber_id: Uuid) -> AppResult<RiskLevel> {
        let score = self.scorer.score(subscriber_id).await?;
        let level = RiskLevel::from_score(score);
        self.store
            .update_subscriber_engagement(subscriber_id, score, level)
            .await?;

        debug!(subscriber_id = %subscriber_id, score, risk_level = %level, "Classified subscriber");
        Ok(level)
    }

    /// Current stored tier counts.
    pub async fn distribution(&self) -> AppResult<RiskDistribution> {
        let rows = self.store.risk_level_counts().await?;

        let mut distribution = RiskDistribution::default();
        for row in rows {
            let bucket = match row.risk_level {
                Some(RiskLevel::Active) => &mut distribution.active,
                Some(RiskLevel::AtRisk) => &mut distribution.at_risk,
                Some(RiskLevel::Churned) => &mut distribution.churned,
                Some(RiskLevel::Dormant) => &mut distribution.dormant,
                None => &mut distribution.unclassified,
            };
            *bucket += row.subscribers;
        }
        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;

    fn classifier(fx: &Fixture, concurrency: usize) -> RiskClassifier {
        let store = fx.store();
        RiskClassifier::new(store.clone(), EngagementScorer::new(store, 30), concurrency)
    }

    /// Seeds one subscriber per tier and returns their ids in tier order
    /// active, at_risk, churned, dormant.
    async fn seed_tiers(fx: &Fixture) -> [Uuid; 4] {
        let issue = fx.newsletter("Issue", Some(fx.days_ago(3))).await;
        let mut ids = [Uuid::nil(); 4];
        // opens per subscriber: 30 => active, 12 => at_risk, 4 => churned, 0 => dormant
        for (slot, opens) in [30, 12, 4, 0].into_iter().enumerate() {
            let id = fx.subscriber().await;
            for _ in 0..opens {
                fx.send(issue, id, fx.days_ago(3), Some(fx.days_ago(2))).await;
            }
            ids[slot] = id;
        }
        ids
    }

    #[tokio::test]
    async fn test_recompute_all_classifies_and_persists() {
        let fx = Fixture::new();
        let [active, at_risk, churned, dormant] = seed_tiers(&fx).await;
        let inactive = fx.subscriber_with(|s| s.is_active = false).await;

        let summary = classifier(&fx, 4).recompute_all().await.unwrap();
        assert_eq!(
            summary,
            RiskBatchSummary {
                processed: 4,
                active: 1,
                at_risk: 1,
                churned: 1,
                dormant: 1,
            }
        );

        let stored = |id| {
            let memory = fx.memory.clone();
            async move { memory.subscriber(id).await.unwrap().unwrap() }
        };
        assert_eq!(stored(active).await.risk_level, Some(RiskLevel::Active));
        assert_eq!(stored(active).await.engagement_score, 30);
        assert_eq!(stored(at_risk).await.risk_level, Some(RiskLevel::AtRisk));
        assert_eq!(stored(churned).await.risk_level, Some(RiskLevel::Churned));
        assert_eq!(stored(dormant).await.risk_level, Some(RiskLevel::Dormant));
        assert_eq!(stored(inactive).await.risk_level, None);
    }

    #[tokio::test]
    async fn test_recompute_is_idempotent() {
        let fx = Fixture::new();
        let ids = seed_tiers(&fx).await;
        let risk = classifier(&fx, 2);

        let first = risk.recompute_all().await.unwrap();
        let mut after_first = Vec::new();
        for id in ids {
            let s = fx.memory.subscriber(id).await.unwrap().unwrap();
            after_first.push((s.engagement_score, s.risk_level));
        }

        let second = risk.recompute_all().await.unwrap();
        let mut after_second = Vec::new();
        for id in ids {
            let s = fx.memory.subscriber(id).await.unwrap().unwrap();
            after_second.push((s.engagement_score, s.risk_level));
        }

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn test_failure_stops_batch_and_keeps_progress() {
        let fx = Fixture::new();
        let issue = fx.newsletter("Issue", Some(fx.days_ago(3))).await;
        let mut ids = Vec::new();
        for offset in 0..3 {
            // Distinct creation times fix the processing order.
            let id = fx
                .subscriber_with(|s| s.created_at = fx.days_ago(50 - offset))
                .await;
            fx.send(issue, id, fx.days_ago(3), Some(fx.days_ago(2))).await;
            ids.push(id);
        }
        fx.memory.fail_updates_for(ids[1]).await;

        let result = classifier(&fx, 1).recompute_all().await;
        assert!(result.is_err());

        let first = fx.memory.subscriber(ids[0]).await.unwrap().unwrap();
        let third = fx.memory.subscriber(ids[2]).await.unwrap().unwrap();
        assert_eq!(first.risk_level, Some(RiskLevel::Churned));
        assert_eq!(third.risk_level, None);
    }

    #[tokio::test]
    async fn test_distribution_counts_stored_tiers() {
        let fx = Fixture::new();
        seed_tiers(&fx).await;
        let risk = classifier(&fx, 4);

        let before = risk.distribution().await.unwrap();
        assert_eq!(before.unclassified, 4);
        assert_eq!(before.total(), 4);

        risk.recompute_all().await.unwrap();
        let after = risk.distribution().await.unwrap();
        assert_eq!(
            after,
            RiskDistribution {
                active: 1,
                at_risk: 1,
                churned: 1,
                dormant: 1,
                unclassified: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_population() {
        let fx = Fixture::new();
        let summary = classifier(&fx, 4).recompute_all().await.unwrap();
        assert_eq!(summary, RiskBatchSummary::default());
    }
}
