//! Geographic and audience rollups.
//!
//! Every percentage here is a share of all active subscribers, unlike
//! the window-relative rates elsewhere. Country open and click rates are
//! the exception: they are relative to the country's in-window sends.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_core::result::AppResult;
use newsroom_core::types::ReportWindow;
use newsroom_database::FactStore;
use newsroom_database::store::SegmentGroup;

use super::REPORT_QUERY_CONCURRENCY;
use super::rates::{percentage, round2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    pub country: String,
    pub country_name: Option<String>,
    pub subscribers: i64,
    pub percentage: f64,
    /// Opened over in-window sends to the country.
    pub open_rate: f64,
    /// Distinct clickers over in-window sends to the country.
    pub click_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityBreakdown {
    pub city: String,
    pub subscribers: i64,
    pub avg_engagement_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceSegment {
    pub audience: String,
    pub subscribers: i64,
    pub percentage: f64,
    pub avg_engagement_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySizeSegment {
    pub company_size: String,
    pub subscribers: i64,
    pub percentage: f64,
}

/// Location and audience breakdown of the active subscriber base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceBreakdown {
    pub window_days: u32,
    pub total_active: i64,
    pub countries: Vec<CountryBreakdown>,
    pub cities: Vec<CityBreakdown>,
    pub audiences: Vec<AudienceSegment>,
    pub company_sizes: Vec<CompanySizeSegment>,
}

/// Builds location and audience rollups. Subscribers without a value for
/// a dimension are left out of that dimension.
#[derive(Debug, Clone)]
pub struct AudienceAggregator {
    store: Arc<dyn FactStore>,
    top_cities_limit: u32,
}

impl AudienceAggregator {
    /// Create an aggregator listing up to `top_cities_limit` cities.
    pub fn new(store: Arc<dyn FactStore>, top_cities_limit: u32) -> Self {
        Self {
            store,
            top_cities_limit,
        }
    }

    /// Build the breakdown for the window.
    pub async fn breakdown(&self, window: ReportWindow) -> AppResult<AudienceBreakdown> {
        let since = window.start();
        let total_active = self.store.count_active_subscribers().await?;

        let groups = self.store.country_groups().await?;
        let countries: Vec<CountryBreakdown> = stream::iter(groups)
            .map(|group| async move {
                let engagement = self.store.country_engagement(&group.country, since).await?;
                AppResult::Ok(CountryBreakdown {
                    percentage: round2(percentage(group.subscribers, total_active)),
                    open_rate: round2(percentage(engagement.opened, engagement.sends)),
                    click_rate: round2(percentage(engagement.unique_clickers, engagement.sends)),
                    country: group.country,
                    country_name: group.country_name,
                    subscribers: group.subscribers,
                })
            })
            .buffered(REPORT_QUERY_CONCURRENCY)
            .try_collect()
            .await?;

        let cities = self
            .store
            .city_groups(self.top_cities_limit)
            .await?
            .into_iter()
            .map(|g| CityBreakdown {
                city: g.label,
                subscribers: g.subscribers,
                avg_engagement_score: round2(g.avg_engagement),
            })
            .collect();

        let audiences = self
            .store
            .audience_groups()
            .await?
            .into_iter()
            .map(|g: SegmentGroup| AudienceSegment {
                percentage: round2(percentage(g.subscribers, total_active)),
                avg_engagement_score: round2(g.avg_engagement),
                audience: g.label,
                subscribers: g.subscribers,
            })
            .collect();

        let company_sizes = self
            .store
            .company_size_groups()
            .await?
            .into_iter()
            .map(|g| CompanySizeSegment {
                percentage: round2(percentage(g.subscribers, total_active)),
                company_size: g.label,
                subscribers: g.subscribers,
            })
            .collect();

        let breakdown = AudienceBreakdown {
            window_days: window.len_days(),
            total_active,
            countries,
            cities,
            audiences,
            company_sizes,
        };

        info!(
            window_days = window.len_days(),
            total_active,
            countries = breakdown.countries.len(),
            cities = breakdown.cities.len(),
            "Built audience breakdown"
        );

        Ok(breakdown)
    }
}
