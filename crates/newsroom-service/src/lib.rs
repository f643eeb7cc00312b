//! # newsroom-service
//!
//! The analytics engine. Each component turns raw facts from a
//! [`FactStore`](newsroom_database::FactStore) into one report shape:
//! engagement scores, risk tiers, system health, source reliability,
//! growth series, content intelligence, newsletter comparisons, the
//! comprehensive overview and audience rollups.
//!
//! Components follow constructor injection: the fact store is handed in
//! as an `Arc<dyn FactStore>` at construction time. [`AnalyticsEngine`]
//! wires them all together.

pub mod analytics;

pub use analytics::AnalyticsEngine;
