//! Analytics engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Tunables for the analytics engine.
///
/// Scoring weights and risk thresholds are not configurable; dashboards
/// rely on them being stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Window used when a request does not specify `days`.
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    /// Largest window a caller may request.
    #[serde(default = "default_max_window_days")]
    pub max_window_days: u32,
    /// Trailing window for per-subscriber engagement scoring.
    #[serde(default = "default_window_days")]
    pub engagement_window_days: u32,
    /// Newsletters returned by the comparator when no limit is given.
    #[serde(default = "default_comparison_limit")]
    pub default_comparison_limit: u32,
    /// Newsletters fetched by the overview before filtering to its window.
    #[serde(default = "default_overview_newsletter_limit")]
    pub overview_newsletter_limit: u32,
    /// Sources listed in the content intelligence report.
    #[serde(default = "default_top_sources_limit")]
    pub top_sources_limit: u32,
    /// Cities listed in the audience breakdown.
    #[serde(default = "default_top_cities_limit")]
    pub top_cities_limit: u32,
    /// Subscribers scored in parallel by the risk batch (1 = sequential).
    #[serde(default = "default_risk_batch_concurrency")]
    pub risk_batch_concurrency: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            max_window_days: default_max_window_days(),
            engagement_window_days: default_window_days(),
            default_comparison_limit: default_comparison_limit(),
            overview_newsletter_limit: default_overview_newsletter_limit(),
            top_sources_limit: default_top_sources_limit(),
            top_cities_limit: default_top_cities_limit(),
            risk_batch_concurrency: default_risk_batch_concurrency(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate the analytics section.
    pub fn validate(&self) -> Result<(), AppError> {
        let positive = [
            ("analytics.default_window_days", self.default_window_days),
            ("analytics.max_window_days", self.max_window_days),
            ("analytics.engagement_window_days", self.engagement_window_days),
            (
                "analytics.default_comparison_limit",
                self.default_comparison_limit,
            ),
            (
                "analytics.overview_newsletter_limit",
                self.overview_newsletter_limit,
            ),
            ("analytics.top_sources_limit", self.top_sources_limit),
            ("analytics.top_cities_limit", self.top_cities_limit),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(AppError::configuration(format!("{name} must be > 0")));
            }
        }

        if self.default_window_days > self.max_window_days {
            return Err(AppError::configuration(
                "analytics.default_window_days must not exceed analytics.max_window_days",
            ));
        }

        if self.risk_batch_concurrency == 0 {
            return Err(AppError::configuration(
                "analytics.risk_batch_concurrency must be >= 1",
            ));
        }

        Ok(())
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_max_window_days() -> u32 {
    365
}

fn default_comparison_limit() -> u32 {
    10
}

fn default_overview_newsletter_limit() -> u32 {
    100
}

fn default_top_sources_limit() -> u32 {
    10
}

fn default_top_cities_limit() -> u32 {
    20
}

fn default_risk_batch_concurrency() -> usize {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_dashboard_contract() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.default_window_days, 30);
        assert_eq!(config.engagement_window_days, 30);
        assert_eq!(config.top_sources_limit, 10);
        assert_eq!(config.top_cities_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_window_cannot_exceed_max() {
        let config = AnalyticsConfig {
            default_window_days: 400,
            ..AnalyticsConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = AnalyticsConfig {
            top_cities_limit: 0,
            ..AnalyticsConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("top_cities_limit"));
    }
}
