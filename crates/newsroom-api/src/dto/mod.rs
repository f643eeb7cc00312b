//! Request and response DTOs.

pub mod request;
pub mod response;

pub use request::TrackEventRequest;
pub use response::{ApiResponse, DetailedHealthResponse, HealthResponse};
