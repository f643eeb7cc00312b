//! Subscriber domain entities.

pub mod model;
pub mod risk;

pub use model::{NewSubscriber, Subscriber};
pub use risk::RiskLevel;
