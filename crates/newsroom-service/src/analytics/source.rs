//! Content source reliability scoring.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_database::FactStore;
use newsroom_database::store::SourceContentCounts;

use super::rates::{clamp_score, percentage, ratio, round2};

const ACCEPTANCE_WEIGHT: f64 = 0.6;
/// Maps per-article clicks (rarely above ~10) onto a 0-40 range.
const ENGAGEMENT_MULTIPLIER: f64 = 4.0;

/// Reliability of one source with the inputs behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReliability {
    pub source_id: Uuid,
    /// `None` when the source does not exist.
    pub name: Option<String>,
    pub total_items: i64,
    pub accepted_items: i64,
    pub acceptance_rate: f64,
    /// Mean click count per accepted item.
    pub avg_engagement: f64,
    pub score: u32,
}

/// Score a source from its content counts.
pub fn reliability_score(counts: &SourceContentCounts) -> u32 {
    if counts.total == 0 {
        return 0;
    }
    let acceptance_rate = percentage(counts.accepted, counts.total);
    let avg_engagement = ratio(counts.accepted_clicks, counts.accepted);
    clamp_score(acceptance_rate * ACCEPTANCE_WEIGHT + avg_engagement * ENGAGEMENT_MULTIPLIER)
}

/// Computes 0-100 reliability scores for content sources.
#[derive(Debug, Clone)]
pub struct SourceReliabilityScorer {
    store: Arc<dyn FactStore>,
}

impl SourceReliabilityScorer {
    /// Create a new source reliability scorer.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Reliability score of one source. Sources without items score 0.
    pub async fn reliability(&self, source_id: Uuid) -> AppResult<u32> {
        let counts = self.store.source_content_counts(source_id).await?;
        let score = reliability_score(&counts);
        debug!(source_id = %source_id, total = counts.total, score, "Scored source reliability");
        Ok(score)
    }

    /// Reliability score of one source with its name and rates.
    pub async fn details(&self, source_id: Uuid) -> AppResult<SourceReliability> {
        let name = self.store.source_name(source_id).await?;
        let counts = self.store.source_content_counts(source_id).await?;

        Ok(SourceReliability {
            source_id,
            name,
            total_items: counts.total,
            accepted_items: counts.accepted,
            acceptance_rate: round2(percentage(counts.accepted, counts.total)),
            avg_engagement: round2(ratio(counts.accepted_clicks, counts.accepted)),
            score: reliability_score(&counts),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;
    use newsroom_entity::content::ContentStatus;

    #[test]
    fn test_formula() {
        // 60% acceptance, 2.5 clicks per accepted item: 36 + 10
        let counts = SourceContentCounts {
            total: 10,
            accepted: 6,
            accepted_clicks: 15,
        };
        assert_eq!(reliability_score(&counts), 46);
    }

    #[test]
    fn test_no_items_scores_zero() {
        assert_eq!(reliability_score(&SourceContentCounts::default()), 0);
    }

    #[test]
    fn test_no_accepted_items() {
        let counts = SourceContentCounts {
            total: 8,
            accepted: 0,
            accepted_clicks: 0,
        };
        assert_eq!(reliability_score(&counts), 0);
    }

    #[test]
    fn test_capped_at_100() {
        let counts = SourceContentCounts {
            total: 1,
            accepted: 1,
            accepted_clicks: 50,
        };
        assert_eq!(reliability_score(&counts), 100);
    }

    #[tokio::test]
    async fn test_reliability_from_store() {
        let fx = Fixture::new();
        let source = fx.source("Hacker Digest").await;
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Issue", Some(fx.days_ago(1))).await;
        let send = fx.send(issue, reader, fx.days_ago(1), None).await;

        let accepted = fx
            .content(|c| {
                c.source_id = Some(source);
                c.status = ContentStatus::Accepted;
            })
            .await;
        let discarded = fx
            .content(|c| {
                c.source_id = Some(source);
                c.status = ContentStatus::Discarded;
            })
            .await;
        for _ in 0..3 {
            fx.click(reader, send, accepted, fx.days_ago(1)).await;
        }
        // Clicks on non-accepted items do not count.
        fx.click(reader, send, discarded, fx.days_ago(1)).await;

        let scorer = SourceReliabilityScorer::new(fx.store());
        // 50% acceptance, 3 clicks per accepted item: 30 + 12
        assert_eq!(scorer.reliability(source).await.unwrap(), 42);

        let details = scorer.details(source).await.unwrap();
        assert_eq!(details.name.as_deref(), Some("Hacker Digest"));
        assert_eq!(details.acceptance_rate, 50.0);
        assert_eq!(details.avg_engagement, 3.0);
        assert_eq!(details.score, 42);
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let fx = Fixture::new();
        let scorer = SourceReliabilityScorer::new(fx.store());
        let details = scorer.details(Uuid::new_v4()).await.unwrap();
        assert_eq!(details.name, None);
        assert_eq!(details.score, 0);
        assert_eq!(details.acceptance_rate, 0.0);
    }
}
