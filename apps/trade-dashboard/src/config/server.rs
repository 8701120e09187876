//! Dashboard HTTP listener.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Listener settings for the dashboard API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port serving `/health` and `/api/v1/*`.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interface to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Grace period for in-flight work after a shutdown signal.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Listen address from `bind_address` and `http_port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.bind_address, self.http_port).parse()
    }

    /// Shutdown grace period.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

const fn default_http_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

const fn default_shutdown_timeout_secs() -> u64 {
    30
}
