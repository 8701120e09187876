//! HTTP/REST API adapter.
//!
//! Inbound adapter serving the dashboard snapshot and bot controls.

mod controller;
mod response;

pub use controller::{AppState, create_router};
pub use response::{HealthResponse, MetricsDisplay, MetricsResponse};
