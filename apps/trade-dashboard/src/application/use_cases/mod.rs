//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod refresh_dashboard;

pub use refresh_dashboard::{
    DEFAULT_FETCH_TIMEOUT, DashboardSnapshot, RefreshDashboardUseCase, RefreshError,
};
