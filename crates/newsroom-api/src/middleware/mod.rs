//! Tower middleware builders.

pub mod cors;
pub mod logging;
