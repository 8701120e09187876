//! Refresh loop configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shortest accepted polling interval.
pub const MIN_INTERVAL_SECS: u64 = 5;
/// Longest accepted polling interval.
pub const MAX_INTERVAL_SECS: u64 = 3600;

/// Refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refreshes.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound for one data source fetch, retries included.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl RefreshConfig {
    /// Interval as a duration.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Fetch timeout as a duration.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

const fn default_interval_secs() -> u64 {
    30
}

const fn default_fetch_timeout_secs() -> u64 {
    20
}
