//! Comprehensive overview combining reach, categories and newsletters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;

use super::content::{CategoryTrend, ContentIntelligenceReporter};
use super::newsletter::{NewsletterComparator, NewsletterPerformance};
use super::rates::{mean, percentage, ratio, round2};

/// Share of active subscribers who opened or clicked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberReach {
    pub total_active: i64,
    pub opened: i64,
    pub clicked: i64,
    pub open_percentage: f64,
    pub click_percentage: f64,
}

/// How many sent articles drew clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleReach {
    pub sent: i64,
    pub clicked: i64,
    pub total_clicks: i64,
    pub clicked_percentage: f64,
    pub avg_clicks_per_article: f64,
}

/// Unweighted averages over newsletters sent in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterAverages {
    pub count: usize,
    pub avg_open_rate: f64,
    pub avg_click_rate: f64,
}

impl NewsletterAverages {
    /// Average the per-newsletter rates, each newsletter counting once.
    pub fn from_performance(rows: &[NewsletterPerformance]) -> Self {
        let open_rates: Vec<f64> = rows.iter().map(|r| r.open_rate).collect();
        let click_rates: Vec<f64> = rows.iter().map(|r| r.click_rate).collect();
        Self {
            count: rows.len(),
            avg_open_rate: round2(mean(&open_rates)),
            avg_click_rate: round2(mean(&click_rates)),
        }
    }
}

/// One-call dashboard payload for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveOverview {
    pub window_days: u32,
    pub subscribers: SubscriberReach,
    pub articles: ArticleReach,
    pub categories: Vec<CategoryTrend>,
    pub newsletters: NewsletterAverages,
}

/// Assembles the comprehensive overview.
///
/// Newsletter averages reuse the comparator's per-newsletter rows and are
/// reduced in memory. Any failing sub-query fails the whole overview.
#[derive(Debug, Clone)]
pub struct OverviewAggregator {
    store: Arc<dyn FactStore>,
    content: ContentIntelligenceReporter,
    comparator: NewsletterComparator,
    newsletter_limit: u32,
}

impl OverviewAggregator {
    /// Create an aggregator scanning up to `newsletter_limit` recent newsletters.
    pub fn new(
        store: Arc<dyn FactStore>,
        content: ContentIntelligenceReporter,
        comparator: NewsletterComparator,
        newsletter_limit: u32,
    ) -> Self {
        Self {
            store,
            content,
            comparator,
            newsletter_limit,
        }
    }

    /// Build the overview for the window.
    pub async fn overview(&self, window: ReportWindow) -> AppResult<ComprehensiveOverview> {
        let since = window.start();

        let total_active = self.store.count_active_subscribers().await?;
        let reach = self.store.reach_counts(since).await?;
        let categories = self.content.category_trends(window).await?;

        let in_window: Vec<NewsletterPerformance> = self
            .comparator
            .compare(self.newsletter_limit)
            .await?
            .into_iter()
            .filter(|n| n.sent_at.is_some_and(|at| at >= since))
            .collect();

        let subscribers = SubscriberReach {
            total_active,
            opened: reach.openers,
            clicked: reach.clickers,
            open_percentage: round2(percentage(reach.openers, total_active)),
            click_percentage: round2(percentage(reach.clickers, total_active)),
        };
        let articles = ArticleReach {
            sent: reach.articles_sent,
            clicked: reach.articles_clicked,
            total_clicks: reach.total_clicks,
            clicked_percentage: round2(percentage(reach.articles_clicked, reach.articles_sent)),
            avg_clicks_per_article: round2(ratio(reach.total_clicks, reach.articles_sent)),
        };
        let newsletters = NewsletterAverages::from_performance(&in_window);

        info!(
            window_days = window.len_days(),
            total_active,
            newsletters = newsletters.count,
            "Built comprehensive overview"
        );

        Ok(ComprehensiveOverview {
            window_days: window.len_days(),
            subscribers,
            articles,
            categories,
            newsletters,
        })
    }
}
