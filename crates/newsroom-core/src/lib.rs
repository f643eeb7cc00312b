//! # newsroom-core
//!
//! Core crate for Newsroom. Contains configuration schemas, report window
//! types, and the unified error system shared by the analytics engine,
//! its fact store implementations, and every outer surface.
//!
//! This crate has **no** internal dependencies on other Newsroom crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
