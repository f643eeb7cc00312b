//! # newsroom-database
//!
//! PostgreSQL connection management, per-entity repositories, and the
//! [`FactStore`] query interface the analytics engine is written against.
//!
//! Two fact store implementations are provided: [`PgFactStore`] backed by
//! the repositories, and [`MemoryFactStore`] holding facts in process.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{FactStore, MemoryFactStore, PgFactStore};
