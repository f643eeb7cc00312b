//! Subscriber risk tier enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete lifecycle classification derived from the engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "risk_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Score of 30 or more.
    Active,
    /// Score in `10..30`.
    AtRisk,
    /// Score in `1..10`.
    Churned,
    /// No engagement at all in the window.
    Dormant,
}

impl RiskLevel {
    /// All tiers, in dashboard display order.
    pub const ALL: [RiskLevel; 4] = [Self::Active, Self::AtRisk, Self::Churned, Self::Dormant];

    /// Classify an engagement score.
    ///
    /// Checks run in this order: `0` is dormant before the generic
    /// `< 10` churn bucket is considered.
    pub fn from_score(score: u32) -> Self {
        if score == 0 {
            Self::Dormant
        } else if score < 10 {
            Self::Churned
        } else if score < 30 {
            Self::AtRisk
        } else {
            Self::Active
        }
    }

    /// Return the tier as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::AtRisk => "at_risk",
            Self::Churned => "churned",
            Self::Dormant => "dormant",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = newsroom_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "at_risk" => Ok(Self::AtRisk),
            "churned" => Ok(Self::Churned),
            "dormant" => Ok(Self::Dormant),
            _ => Err(newsroom_core::AppError::validation(format!(
                "Invalid risk level: '{s}'. Expected one of: active, at_risk, churned, dormant"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Dormant);
        assert_eq!(RiskLevel::from_score(1), RiskLevel::Churned);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::Churned);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::AtRisk);
        assert_eq!(RiskLevel::from_score(29), RiskLevel::AtRisk);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Active);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::Active);
    }

    #[test]
    fn test_partition_is_monotonic() {
        // Every score maps to exactly one tier and tiers never go back down
        // as the score increases.
        fn rank(level: RiskLevel) -> u8 {
            match level {
                RiskLevel::Dormant => 0,
                RiskLevel::Churned => 1,
                RiskLevel::AtRisk => 2,
                RiskLevel::Active => 3,
            }
        }

        let mut previous = rank(RiskLevel::from_score(0));
        for score in 0..=10_000u32 {
            let level = RiskLevel::from_score(score);
            let expected = match score {
                0 => RiskLevel::Dormant,
                1..=9 => RiskLevel::Churned,
                10..=29 => RiskLevel::AtRisk,
                _ => RiskLevel::Active,
            };
            assert_eq!(level, expected, "score {score}");
            assert!(rank(level) >= previous, "tier dropped at score {score}");
            previous = rank(level);
        }
    }

    #[test]
    fn test_round_trips_through_str() {
        for level in RiskLevel::ALL {
            assert_eq!(level.as_str().parse::<RiskLevel>().unwrap(), level);
        }
        assert!("lapsed".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&RiskLevel::AtRisk).unwrap();
        assert_eq!(json, "\"at_risk\"");
    }
}
