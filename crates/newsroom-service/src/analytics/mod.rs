//! Analytics components.
//!
//! One struct per report. Components only read from the fact store,
//! except [`RiskClassifier`] (writes stored score and tier) and
//! [`EventTracker`] (appends events and writes `last_engaged_at`). The
//! two writers touch disjoint subscriber columns.

pub mod audience;
pub mod content;
pub mod engagement;
pub mod engine;
pub mod events;
pub mod growth;
pub mod health;
pub mod newsletter;
pub mod overview;
pub mod rates;
pub mod risk;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

/// Fact store queries one report keeps in flight at once.
pub const REPORT_QUERY_CONCURRENCY: usize = 8;

pub use audience::{AudienceAggregator, AudienceBreakdown};
pub use content::{
    CATEGORY_GROWTH_PLACEHOLDER, CategoryTrend, ContentIntelligence, ContentIntelligenceReporter,
};
pub use engagement::{EngagementBreakdown, EngagementScorer};
pub use engine::AnalyticsEngine;
pub use events::EventTracker;
pub use growth::{GrowthPoint, GrowthReporter};
pub use health::{HealthScore, HealthScorer};
pub use newsletter::{NewsletterComparator, NewsletterPerformance};
pub use overview::{ComprehensiveOverview, OverviewAggregator};
pub use risk::{RiskBatchSummary, RiskClassifier, RiskDistribution};
pub use source::{SourceReliability, SourceReliabilityScorer};
