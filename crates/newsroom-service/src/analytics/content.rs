//! Content intelligence: top sources, category rollups and freshness.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;
use newsroom_database::store::CategoryClicks;

use super::REPORT_QUERY_CONCURRENCY;
use super::source::SourceReliabilityScorer;

/// Value reported for [`CategoryTrend::growth`].
///
/// Period-over-period comparison is not implemented; consumers must not
/// read meaning into this field yet.
pub const CATEGORY_GROWTH_PLACEHOLDER: f64 = 0.0;

/// A source ranked by clicks, with its reliability score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePerformance {
    pub source_id: Uuid,
    pub name: String,
    pub clicks: i64,
    pub reliability: u32,
}

/// Click rollup for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category_id: Uuid,
    pub name: String,
    pub clicks: i64,
    /// Always [`CATEGORY_GROWTH_PLACEHOLDER`].
    pub growth: f64,
}

impl From<CategoryClicks> for CategoryTrend {
    fn from(row: CategoryClicks) -> Self {
        Self {
            category_id: row.category_id,
            name: row.name,
            clicks: row.clicks,
            growth: CATEGORY_GROWTH_PLACEHOLDER,
        }
    }
}

/// Content intelligence report for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentIntelligence {
    pub window_days: u32,
    pub top_sources: Vec<SourcePerformance>,
    pub category_trends: Vec<CategoryTrend>,
    /// Whole days between publication and send, 0 when nothing qualifies.
    pub avg_freshness_days: i64,
}

/// Builds the content intelligence report.
#[derive(Debug, Clone)]
pub struct ContentIntelligenceReporter {
    store: Arc<dyn FactStore>,
    reliability: SourceReliabilityScorer,
    top_sources_limit: u32,
}

impl ContentIntelligenceReporter {
    /// Create a reporter listing up to `top_sources_limit` sources.
    pub fn new(
        store: Arc<dyn FactStore>,
        reliability: SourceReliabilityScorer,
        top_sources_limit: u32,
    ) -> Self {
        Self {
            store,
            reliability,
            top_sources_limit,
        }
    }

    /// Category click rollups inside the window, most clicked first.
    pub async fn category_trends(&self, window: ReportWindow) -> AppResult<Vec<CategoryTrend>> {
        let rows = self.store.category_clicks(window.start()).await?;
        Ok(rows.into_iter().map(CategoryTrend::from).collect())
    }

    /// Build the report for the window.
    pub async fn report(&self, window: ReportWindow) -> AppResult<ContentIntelligence> {
        let since = window.start();

        let ranked = self
            .store
            .top_sources_by_clicks(since, self.top_sources_limit)
            .await?;
        let top_sources: Vec<SourcePerformance> = stream::iter(ranked)
            .map(|row| async move {
                let reliability = self.reliability.reliability(row.source_id).await?;
                AppResult::Ok(SourcePerformance {
                    source_id: row.source_id,
                    name: row.name,
                    clicks: row.clicks,
                    reliability,
                })
            })
            .buffered(REPORT_QUERY_CONCURRENCY)
            .try_collect()
            .await?;

        let category_trends = self.category_trends(window).await?;
        let avg_freshness_days = self
            .store
            .average_freshness_days(since)
            .await?
            .map(|days| days.round() as i64)
            .unwrap_or(0);

        info!(
            window_days = window.len_days(),
            sources = top_sources.len(),
            categories = category_trends.len(),
            avg_freshness_days,
            "Built content intelligence report"
        );

        Ok(ContentIntelligence {
            window_days: window.len_days(),
            top_sources,
            category_trends,
            avg_freshness_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::Fixture;
    use chrono::Duration;
    use newsroom_entity::content::ContentStatus;

    fn reporter(fx: &Fixture, limit: u32) -> ContentIntelligenceReporter {
        let store = fx.store();
        ContentIntelligenceReporter::new(store.clone(), SourceReliabilityScorer::new(store), limit)
    }

    #[tokio::test]
    async fn test_empty_report() {
        let fx = Fixture::new();
        let report = reporter(&fx, 10).report(ReportWindow::days(30)).await.unwrap();
        assert!(report.top_sources.is_empty());
        assert!(report.category_trends.is_empty());
        assert_eq!(report.avg_freshness_days, 0);
    }

    #[tokio::test]
    async fn test_sources_and_categories_ranked_by_clicks() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Issue", Some(fx.days_ago(3))).await;
        let send = fx.send(issue, reader, fx.days_ago(3), None).await;

        let wire = fx.source("Wire").await;
        let blog = fx.source("Blog").await;
        let quiet = fx.source("Quiet").await;
        let rust = fx.category("Rust").await;
        let infra = fx.category("Infra").await;

        let wire_item = fx
            .content(|c| {
                c.source_id = Some(wire);
                c.category_id = Some(rust);
                c.status = ContentStatus::Accepted;
            })
            .await;
        let blog_item = fx
            .content(|c| {
                c.source_id = Some(blog);
                c.category_id = Some(infra);
                c.status = ContentStatus::Accepted;
            })
            .await;
        fx.content(|c| c.source_id = Some(quiet)).await;

        for _ in 0..3 {
            fx.click(reader, send, wire_item, fx.days_ago(2)).await;
        }
        fx.click(reader, send, blog_item, fx.days_ago(2)).await;
        // Outside the window.
        for _ in 0..5 {
            fx.click(reader, send, blog_item, fx.days_ago(40)).await;
        }

        let report = reporter(&fx, 10).report(ReportWindow::days(30)).await.unwrap();

        let sources: Vec<(&str, i64)> = report
            .top_sources
            .iter()
            .map(|s| (s.name.as_str(), s.clicks))
            .collect();
        assert_eq!(sources, vec![("Wire", 3), ("Blog", 1)]);
        // 100% acceptance, 3 clicks per item: 60 + 12
        assert_eq!(report.top_sources[0].reliability, 72);
        // 100% acceptance, all 6 clicks count: 60 + 24
        assert_eq!(report.top_sources[1].reliability, 84);

        let categories: Vec<(&str, i64)> = report
            .category_trends
            .iter()
            .map(|c| (c.name.as_str(), c.clicks))
            .collect();
        assert_eq!(categories, vec![("Rust", 3), ("Infra", 1)]);
        assert!(
            report
                .category_trends
                .iter()
                .all(|c| c.growth == CATEGORY_GROWTH_PLACEHOLDER)
        );
    }

    #[tokio::test]
    async fn test_top_sources_respects_limit() {
        let fx = Fixture::new();
        let reader = fx.subscriber().await;
        let issue = fx.newsletter("Issue", Some(fx.days_ago(1))).await;
        let send = fx.send(issue, reader, fx.days_ago(1), None).await;
        for name in ["A", "B", "C"] {
            let source = fx.source(name).await;
            let item = fx.content(|c| c.source_id = Some(source)).await;
            fx.click(reader, send, item, fx.days_ago(1)).await;
        }

        let report = reporter(&fx, 2).report(ReportWindow::days(7)).await.unwrap();
        assert_eq!(report.top_sources.len(), 2);
    }

    #[tokio::test]
    async fn test_freshness_only_counts_items_sent_in_window() {
        let fx = Fixture::new();
        fx.content(|c| {
            c.published_at = Some(fx.days_ago(5));
            c.sent_at = Some(fx.days_ago(3));
        })
        .await;
        fx.content(|c| {
            c.published_at = Some(fx.days_ago(6) - Duration::hours(12));
            c.sent_at = Some(fx.days_ago(1));
        })
        .await;
        // Sent long ago.
        fx.content(|c| {
            c.published_at = Some(fx.days_ago(100));
            c.sent_at = Some(fx.days_ago(60));
        })
        .await;
        // Never published date.
        fx.content(|c| c.sent_at = Some(fx.days_ago(1))).await;

        let report = reporter(&fx, 10).report(ReportWindow::days(30)).await.unwrap();
        // (2 + 5.5) / 2 = 3.75
        assert_eq!(report.avg_freshness_days, 4);
    }
}
