//! Scheduled task implementations.

pub mod risk;

use async_trait::async_trait;
use serde_json::Value;

use newsroom_core::error::AppError;

pub use risk::RiskRecomputeTask;

/// A unit of work the scheduler runs periodically.
#[async_trait]
pub trait ScheduledTask: Send + Sync + std::fmt::Debug + 'static {
    /// Stable task name used in logs.
    fn name(&self) -> &'static str;

    /// Run the task once, returning a JSON summary.
    async fn run(&self) -> Result<Value, AppError>;
}
