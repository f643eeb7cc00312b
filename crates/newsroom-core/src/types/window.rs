//! Trailing report windows and the `{days, limit}` parameter set every
//! analytics operation accepts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsConfig;
use crate::error::AppError;

/// Maximum `limit` accepted from callers.
pub const MAX_LIMIT: u32 = 100;

/// A trailing window of whole days ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    days: u32,
}

impl ReportWindow {
    /// Create a window of `days` days.
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    /// Number of days covered.
    pub fn len_days(&self) -> u32 {
        self.days
    }

    /// Inclusive lower bound of the window relative to `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(i64::from(self.days))
    }

    /// Inclusive lower bound of the window relative to the current time.
    pub fn start(&self) -> DateTime<Utc> {
        self.since(Utc::now())
    }
}

/// Caller-supplied report parameters (`?days=&limit=`).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReportParams {
    /// Trailing window size in days.
    #[serde(default)]
    pub days: Option<u32>,
    /// Maximum rows to return.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl ReportParams {
    /// Resolve the window, applying the configured default and bounds.
    pub fn window(&self, config: &AnalyticsConfig) -> Result<ReportWindow, AppError> {
        let days = self.days.unwrap_or(config.default_window_days);
        if days == 0 || days > config.max_window_days {
            return Err(AppError::validation(format!(
                "days must be between 1 and {}, got {days}",
                config.max_window_days
            )));
        }
        Ok(ReportWindow::days(days))
    }

    /// Resolve the row limit, applying the configured default and bounds.
    pub fn limit(&self, config: &AnalyticsConfig) -> Result<u32, AppError> {
        let limit = self.limit.unwrap_or(config.default_comparison_limit);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_subtracts_whole_days() {
        let now = DateTime::parse_from_rfc3339("2024-03-31T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let since = ReportWindow::days(30).since(now);
        assert_eq!(since.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_params_default_to_config() {
        let config = AnalyticsConfig::default();
        let params = ReportParams::default();
        assert_eq!(params.window(&config).unwrap().len_days(), 30);
        assert_eq!(params.limit(&config).unwrap(), 10);
    }

    #[test]
    fn test_params_reject_out_of_range() {
        let config = AnalyticsConfig::default();
        let zero = ReportParams {
            days: Some(0),
            limit: None,
        };
        assert!(zero.window(&config).is_err());

        let huge = ReportParams {
            days: Some(config.max_window_days + 1),
            limit: Some(MAX_LIMIT + 1),
        };
        assert!(huge.window(&config).is_err());
        assert!(huge.limit(&config).is_err());
    }
}
