//! Click entities.

pub mod model;

pub use model::Click;
