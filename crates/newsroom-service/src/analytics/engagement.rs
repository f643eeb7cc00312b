//! Per-subscriber engagement scoring.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;
use newsroom_database::store::EngagementCounts;

/// Weight of one opened send.
pub const OPEN_WEIGHT: i64 = 1;
/// Weight of each distinct clicked item.
pub const UNIQUE_CLICK_WEIGHT: i64 = 3;
/// Weight of each additional click on an already clicked item.
pub const REPEAT_CLICK_WEIGHT: i64 = 5;
/// Upper bound of every engagement score.
pub const MAX_ENGAGEMENT_SCORE: u32 = 100;

/// The inputs and result of one engagement score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementBreakdown {
    pub subscriber_id: Uuid,
    pub window_days: u32,
    pub opens: i64,
    pub total_clicks: i64,
    pub unique_clicks: i64,
    pub repeat_clicks: i64,
    pub score: u32,
}

/// Score engagement from raw counts.
///
/// `opens*1 + unique*3 + repeat*5`, capped at 100, where `repeat` is the
/// number of clicks beyond the first on each item.
pub fn engagement_score(counts: &EngagementCounts) -> u32 {
    let repeat = repeat_clicks(counts);
    let raw = counts
        .opens
        .max(0)
        .saturating_mul(OPEN_WEIGHT)
        .saturating_add(counts.unique_clicks.max(0).saturating_mul(UNIQUE_CLICK_WEIGHT))
        .saturating_add(repeat.saturating_mul(REPEAT_CLICK_WEIGHT));

    raw.min(i64::from(MAX_ENGAGEMENT_SCORE)) as u32
}

fn repeat_clicks(counts: &EngagementCounts) -> i64 {
    (counts.total_clicks - counts.unique_clicks).max(0)
}

/// Computes 0-100 engagement scores over a trailing window.
#[derive(Debug, Clone)]
pub struct EngagementScorer {
    store: Arc<dyn FactStore>,
    window: ReportWindow,
}

impl EngagementScorer {
    /// Create a scorer looking back `window_days` days.
    pub fn new(store: Arc<dyn FactStore>, window_days: u32) -> Self {
        Self {
            store,
            window: ReportWindow::days(window_days),
        }
    }

    /// Score one subscriber. Unknown subscribers score 0.
    pub async fn score(&self, subscriber_id: Uuid) -> AppResult<u32> {
        Ok(self.breakdown(subscriber_id).await?.score)
    }

    /// Score one subscriber and return the counts behind the score.
    pub async fn breakdown(&self, subscriber_id: Uuid) -> AppResult<EngagementBreakdown> {
        let counts = self
            .store
            .engagement_counts(subscriber_id, self.window.start())
            .await?;
        let score = engagement_score(&counts);

        debug!(subscriber_id = %subscriber_id, score, "Scored subscriber engagement");

        Ok(EngagementBreakdown {
            subscriber_id,
            window_days: self.window.len_days(),
            opens: counts.opens,
            total_clicks: counts.total_clicks,
            unique_clicks: counts.unique_clicks,
            repeat_clicks: repeat_clicks(&counts),
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;

    fn counts(opens: i64, total_clicks: i64, unique_clicks: i64) -> EngagementCounts {
        EngagementCounts {
            opens,
            total_clicks,
            unique_clicks,
        }
    }

    #[test]
    fn test_weights() {
        assert_eq!(engagement_score(&counts(0, 0, 0)), 0);
        assert_eq!(engagement_score(&counts(4, 0, 0)), 4);
        assert_eq!(engagement_score(&counts(1, 2, 2)), 7);
        assert_eq!(engagement_score(&counts(0, 4, 2)), 16);
    }

    #[test]
    fn test_score_is_capped() {
        assert_eq!(engagement_score(&counts(500, 0, 0)), 100);
        assert_eq!(engagement_score(&counts(0, 30, 1)), 100);
        assert_eq!(engagement_score(&counts(i64::MAX, i64::MAX, 0)), 100);
    }

    #[test]
    fn test_score_bounds_over_count_grid() {
        for opens in 0..40 {
            for unique in 0..15 {
                for extra in 0..15 {
                    let score = engagement_score(&counts(opens, unique + extra, unique));
                    assert!(score <= MAX_ENGAGEMENT_SCORE);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_repeat_clicks_on_same_article() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Weekly", Some(fx.days_ago(2))).await;
        let send = fx.send(issue, reader, fx.days_ago(2), None).await;
        let first = fx.content(|_| {}).await;
        let second = fx.content(|_| {}).await;

        for _ in 0..3 {
            fx.click(reader, send, first, fx.days_ago(1)).await;
        }
        fx.click(reader, send, second, fx.days_ago(1)).await;

        let scorer = EngagementScorer::new(fx.store(), 30);
        let breakdown = scorer.breakdown(reader).await.unwrap();

        assert_eq!(breakdown.opens, 0);
        assert_eq!(breakdown.unique_clicks, 2);
        assert_eq!(breakdown.total_clicks, 4);
        assert_eq!(breakdown.repeat_clicks, 2);
        assert_eq!(breakdown.score, 16);
    }

    #[tokio::test]
    async fn test_activity_outside_window_is_ignored() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Old", Some(fx.days_ago(45))).await;
        let send = fx
            .send(issue, reader, fx.days_ago(45), Some(fx.days_ago(44)))
            .await;
        let item = fx.content(|_| {}).await;
        fx.click(reader, send, item, fx.days_ago(44)).await;

        let scorer = EngagementScorer::new(fx.store(), 30);
        assert_eq!(scorer.score(reader).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_subscriber_scores_zero() {
        let fx = Fixture::new();
        let scorer = EngagementScorer::new(fx.store(), 30);
        assert_eq!(scorer.score(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_a_zero_score() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        fx.memory.set_unavailable(true);

        let scorer = EngagementScorer::new(fx.store(), 30);
        assert!(scorer.score(reader).await.is_err());
    }
}
