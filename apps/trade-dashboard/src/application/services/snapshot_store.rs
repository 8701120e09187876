//! Snapshot Store
//!
//! Holds the dashboard snapshot currently on display. A publish swaps the
//! whole snapshot at once, so readers see either the old or the new one.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::application::use_cases::{DashboardSnapshot, RefreshError};
use crate::domain::shared::Timestamp;

/// Last refresh failure, kept for display next to the stale snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshFailure {
    /// Error message.
    pub message: String,
    /// When the refresh failed.
    pub failed_at: Timestamp,
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<Arc<DashboardSnapshot>>,
    last_error: Option<RefreshFailure>,
    successful_refreshes: u64,
}

/// Shared holder for the latest snapshot.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Option<Arc<DashboardSnapshot>> {
        self.state.read().snapshot.clone()
    }

    /// Whether a snapshot has been published yet.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.state.read().snapshot.is_some()
    }

    /// Replace the snapshot and clear the last error.
    pub fn publish(&self, snapshot: DashboardSnapshot) -> Arc<DashboardSnapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write();
        state.snapshot = Some(Arc::clone(&snapshot));
        state.last_error = None;
        state.successful_refreshes += 1;
        snapshot
    }

    /// Record a failed refresh. The previous snapshot stays in place.
    pub fn record_failure(&self, error: &RefreshError) {
        self.state.write().last_error = Some(RefreshFailure {
            message: error.to_string(),
            failed_at: Timestamp::now(),
        });
    }

    /// Last failure since the most recent successful refresh.
    #[must_use]
    pub fn last_error(&self) -> Option<RefreshFailure> {
        self.state.read().last_error.clone()
    }

    /// Number of snapshots published.
    #[must_use]
    pub fn successful_refreshes(&self) -> u64 {
        self.state.read().successful_refreshes
    }
}
