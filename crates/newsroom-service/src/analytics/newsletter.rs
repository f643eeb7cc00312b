//! Per-newsletter performance comparison.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_database::FactStore;
use newsroom_database::store::NewsletterCounts;
use newsroom_entity::newsletter::NewsletterDraft;

use super::REPORT_QUERY_CONCURRENCY;
use super::rates::{percentage, round2};

const OPEN_RATE_WEIGHT: f64 = 0.5;
const CLICK_RATE_WEIGHT: f64 = 2.0;

/// Audience response to one sent newsletter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterPerformance {
    pub newsletter_id: Uuid,
    pub subject: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub recipients: i64,
    pub opens: i64,
    /// Click events, not unique clickers.
    pub clicks: i64,
    pub open_rate: f64,
    /// Click events per hundred recipients.
    pub click_rate: f64,
    pub engagement_score: u32,
}

impl NewsletterPerformance {
    /// Derive rates and the engagement score from raw counts.
    pub fn from_counts(newsletter: NewsletterDraft, counts: NewsletterCounts) -> Self {
        let open_rate = percentage(counts.opens, counts.recipients);
        let click_rate = percentage(counts.clicks, counts.recipients);

        Self {
            newsletter_id: newsletter.id,
            subject: newsletter.subject,
            sent_at: newsletter.sent_at,
            recipients: counts.recipients,
            opens: counts.opens,
            clicks: counts.clicks,
            open_rate: round2(open_rate),
            click_rate: round2(click_rate),
            engagement_score: engagement(open_rate, click_rate),
        }
    }
}

fn engagement(open_rate: f64, click_rate: f64) -> u32 {
    let raw = open_rate * OPEN_RATE_WEIGHT + click_rate * CLICK_RATE_WEIGHT;
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.round() as u32
}

/// Compares recently sent newsletters.
#[derive(Debug, Clone)]
pub struct NewsletterComparator {
    store: Arc<dyn FactStore>,
}

impl NewsletterComparator {
    /// Create a new newsletter comparator.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// Performance of up to `limit` most recently sent newsletters.
    pub async fn compare(&self, limit: u32) -> AppResult<Vec<NewsletterPerformance>> {
        let newsletters = self.store.recent_sent_newsletters(limit).await?;

        let performance: Vec<NewsletterPerformance> = stream::iter(newsletters)
            .map(|newsletter| async move {
                let counts = self.store.newsletter_counts(newsletter.id).await?;
                AppResult::Ok(NewsletterPerformance::from_counts(newsletter, counts))
            })
            .buffered(REPORT_QUERY_CONCURRENCY)
            .try_collect()
            .await?;

        info!(limit, newsletters = performance.len(), "Compared newsletters");
        Ok(performance)
    }
}
