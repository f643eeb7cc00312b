//! Risk recomputation task.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing;

use newsroom_core::error::AppError;
use newsroom_service::AnalyticsEngine;

use super::ScheduledTask;

/// Rescores every active subscriber and rewrites their risk tier.
///
/// Overlapping ticks are skipped while a run is still in progress. A
/// failed run is logged and retried on the next tick.
#[derive(Debug)]
pub struct RiskRecomputeTask {
    engine: AnalyticsEngine,
    running: Mutex<()>,
}

impl RiskRecomputeTask {
    /// Create a new risk recomputation task.
    pub fn new(engine: AnalyticsEngine) -> Self {
        Self {
            engine,
            running: Mutex::new(()),
        }
    }
}

#[async_trait]
impl ScheduledTask for RiskRecomputeTask {
    fn name(&self) -> &'static str {
        "risk_recompute"
    }

    async fn run(&self) -> Result<Value, AppError> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("Skipping risk recomputation, previous run still in progress");
            return Ok(serde_json::json!({"skipped": true}));
        };

        let summary = self.engine.recompute_risk().await?;
        Ok(serde_json::to_value(summary)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use newsroom_core::config::AnalyticsConfig;
    use newsroom_database::MemoryFactStore;

    #[tokio::test]
    async fn test_run_returns_batch_summary() {
        let store = Arc::new(MemoryFactStore::new());
        let engine = AnalyticsEngine::new(store, &AnalyticsConfig::default());
        let task = RiskRecomputeTask::new(engine);

        let summary = task.run().await.unwrap();
        assert_eq!(summary["processed"], 0);
        assert_eq!(task.name(), "risk_recompute");
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = MemoryFactStore::new();
        store.set_unavailable(true);
        let engine = AnalyticsEngine::new(Arc::new(store), &AnalyticsConfig::default());

        let task = RiskRecomputeTask::new(engine);
        assert!(task.run().await.is_err());
    }
}
