//! System health scoring over newsletter sends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;
use newsroom_database::store::DeliveryCounts;

use super::rates::{clamp_score, percentage, round2};

const DELIVERY_WEIGHT: f64 = 0.4;
const OPEN_WEIGHT: f64 = 0.3;
const CLICK_THROUGH_WEIGHT: f64 = 0.2;
const NON_BOUNCE_WEIGHT: f64 = 0.1;

/// Composite 0-100 health score and the rates behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub score: u32,
    /// Delivered over total sends.
    pub delivery_rate: f64,
    /// Opened delivered sends over delivered sends.
    pub open_rate: f64,
    /// Distinct clickers over delivered sends.
    pub click_through_rate: f64,
    /// Bounced over total sends.
    pub bounce_rate: f64,
}

impl HealthScore {
    /// Compute the score from send outcome counts.
    ///
    /// The composite is computed from the unrounded rates; the reported
    /// rates are rounded to two decimals.
    pub fn from_counts(counts: &DeliveryCounts) -> Self {
        if counts.total == 0 {
            return Self::default();
        }

        let delivery_rate = percentage(counts.delivered, counts.total);
        let open_rate = percentage(counts.opened, counts.delivered);
        let click_through_rate = percentage(counts.unique_clickers, counts.delivered);
        let bounce_rate = percentage(counts.bounced, counts.total);

        let composite = delivery_rate * DELIVERY_WEIGHT
            + open_rate * OPEN_WEIGHT
            + click_through_rate * CLICK_THROUGH_WEIGHT
            + (100.0 - bounce_rate) * NON_BOUNCE_WEIGHT;

        Self {
            score: clamp_score(composite),
            delivery_rate: round2(delivery_rate),
            open_rate: round2(open_rate),
            click_through_rate: round2(click_through_rate),
            bounce_rate: round2(bounce_rate),
        }
    }
}

/// Computes the system health score.
#[derive(Debug, Clone)]
pub struct HealthScorer {
    store: Arc<dyn FactStore>,
}

impl HealthScorer {
    /// Create a new health scorer.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Health of sends dispatched inside the window.
    pub async fn health(&self, window: ReportWindow) -> AppResult<HealthScore> {
        let counts = self.store.delivery_counts(window.start()).await?;
        let health = HealthScore::from_counts(&counts);

        info!(
            window_days = window.len_days(),
            total_sends = counts.total,
            score = health.score,
            "Computed health score"
        );

        Ok(health)
    }
}
