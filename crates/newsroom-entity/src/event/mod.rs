//! Subscriber lifecycle event entities.

pub mod kind;
pub mod model;

pub use kind::EventType;
pub use model::{NewSubscriberEvent, SubscriberEvent};
