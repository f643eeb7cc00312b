//! Scheduled analytics batches for Newsroom.
//!
//! This crate provides:
//! - A cron scheduler that runs registered tasks on their schedule
//! - The risk recomputation task that refreshes stored engagement scores
//!   and risk tiers

pub mod jobs;
pub mod scheduler;

pub use jobs::{RiskRecomputeTask, ScheduledTask};
pub use scheduler::CronScheduler;
