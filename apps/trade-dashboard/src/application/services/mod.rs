//! Application Services
//!
//! Long-running services that coordinate use cases.

mod refresher;
mod snapshot_store;

pub use refresher::{DEFAULT_REFRESH_INTERVAL, DashboardRefresher};
pub use snapshot_store::{RefreshFailure, SnapshotStore};
