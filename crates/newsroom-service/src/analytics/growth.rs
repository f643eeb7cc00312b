//! Daily subscriber growth series.
//!
//! Unsubscribes are approximated as "currently inactive and last updated
//! on that day". Any later update to an inactive subscriber moves them to
//! the day of that update, and subscribers reactivated since are not
//! counted at all. A dedicated `unsubscribed_at` column would remove the
//! ambiguity; until then the approximation is kept as is.

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::info;

use newsroom_core::error::AppError;
use newsroom_core::result::AppResult;
use newsroom_database::FactStore;

use super::REPORT_QUERY_CONCURRENCY;

/// Activity of one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub new_subscribers: i64,
    /// Approximate; see the module documentation.
    pub unsubscribed: i64,
    pub net_growth: i64,
}

/// Builds contiguous daily growth series.
#[derive(Debug, Clone)]
pub struct GrowthReporter {
    store: Arc<dyn FactStore>,
}

impl GrowthReporter {
    /// Create a new growth reporter.
    pub fn new(store: Arc<dyn FactStore>) -> Self {
        Self { store }
    }

    /// `days` daily buckets ending today, oldest first.
    pub async fn growth(&self, days: u32) -> AppResult<Vec<GrowthPoint>> {
        self.growth_until(days, Utc::now().date_naive()).await
    }

    /// `days` daily buckets ending on `last_day`, oldest first.
    ///
    /// Every day is present, zero-filled when nothing happened.
    pub async fn growth_until(&self, days: u32, last_day: NaiveDate) -> AppResult<Vec<GrowthPoint>> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let first_day = last_day
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| AppError::validation(format!("Growth window of {days} days is out of range")))?;

        let series: Vec<GrowthPoint> = stream::iter(first_day.iter_days().take(days as usize))
            .map(|day| self.bucket(day))
            .buffered(REPORT_QUERY_CONCURRENCY)
            .try_collect()
            .await?;

        info!(
            days,
            first_day = %first_day,
            last_day = %last_day,
            signups = series.iter().map(|p| p.new_subscribers).sum::<i64>(),
            "Computed growth series"
        );

        Ok(series)
    }

    async fn bucket(&self, day: NaiveDate) -> AppResult<GrowthPoint> {
        let start = day_start(day);
        let next_day = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::internal(format!("No calendar day after {day}")))?;
        let end = day_start(next_day);

        let new_subscribers = self.store.count_signups(start, end).await?;
        let unsubscribed = self.store.count_unsubscribes(start, end).await?;

        Ok(GrowthPoint {
            date: day,
            new_subscribers,
            unsubscribed,
            net_growth: new_subscribers - unsubscribed,
        })
    }
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
