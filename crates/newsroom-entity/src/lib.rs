//! # newsroom-entity
//!
//! Domain entity models for the Newsroom analytics engine. Every struct in
//! this crate represents a fact table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! database rows additionally derive `sqlx::FromRow`.
//!
//! Only the columns the analytics engine reads or writes are modelled.

pub mod click;
pub mod content;
pub mod event;
pub mod newsletter;
pub mod subscriber;
