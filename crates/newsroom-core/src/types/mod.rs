//! Core type definitions used across the Newsroom workspace.

pub mod window;

pub use window::{MAX_LIMIT, ReportParams, ReportWindow};
