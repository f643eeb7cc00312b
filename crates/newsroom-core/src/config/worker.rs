//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled batch job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression (with seconds) for the risk recomputation
    /// batch. Defaults to daily at 03:00 UTC.
    #[serde(default = "default_risk_cron")]
    pub risk_recompute_cron: String,
    /// Run one risk recomputation immediately on startup.
    #[serde(default)]
    pub run_on_startup: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            risk_recompute_cron: default_risk_cron(),
            run_on_startup: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_risk_cron() -> String {
    "0 0 3 * * *".to_string()
}
