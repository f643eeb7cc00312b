//! Cron scheduler for periodic analytics batches.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use newsroom_core::config::WorkerConfig;
use newsroom_core::error::AppError;
use newsroom_service::AnalyticsEngine;

use crate::jobs::{RiskRecomputeTask, ScheduledTask};

/// Cron-based scheduler for background analytics tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new, empty scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register the built-in analytics tasks from configuration.
    pub async fn register_default_tasks(
        &self,
        config: &WorkerConfig,
        engine: AnalyticsEngine,
    ) -> Result<(), AppError> {
        let risk: Arc<dyn ScheduledTask> = Arc::new(RiskRecomputeTask::new(engine));

        if config.run_on_startup {
            let task = Arc::clone(&risk);
            tokio::spawn(async move { run_task(task).await });
        }

        self.register(&config.risk_recompute_cron, risk).await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Run `task` on a six-field cron schedule.
    pub async fn register(&self, cron: &str, task: Arc<dyn ScheduledTask>) -> Result<(), AppError> {
        let name = task.name();
        let scheduled = Arc::clone(&task);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let task = Arc::clone(&scheduled);
            Box::pin(async move { run_task(task).await })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid cron expression '{cron}' for {name}: {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))?;

        tracing::info!(task = name, cron, "Registered scheduled task");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shut down scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

async fn run_task(task: Arc<dyn ScheduledTask>) {
    let name = task.name();
    tracing::debug!(task = name, "Running scheduled task");
    match task.run().await {
        Ok(summary) => tracing::info!(task = name, summary = %summary, "Scheduled task completed"),
        Err(e) => tracing::error!(task = name, error = %e, "Scheduled task failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    #[derive(Debug)]
    struct NoopTask;

    #[async_trait]
    impl ScheduledTask for NoopTask {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn run(&self) -> Result<Value, AppError> {
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_rejects_malformed_cron() {
        let scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler
            .register("every morning", Arc::new(NoopTask))
            .await
            .unwrap_err();
        assert_eq!(err.kind, newsroom_core::error::ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_accepts_six_field_cron() {
        let scheduler = CronScheduler::new().await.unwrap();
        scheduler
            .register("0 0 3 * * *", Arc::new(NoopTask))
            .await
            .unwrap();
    }
}
