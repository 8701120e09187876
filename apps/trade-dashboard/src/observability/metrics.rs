//! Prometheus metrics for the dashboard service.
//!
//! Covers the refresh cycle, data source latency and record rejection.
//!
//! # Example
//!
//! ```ignore
//! use trade_dashboard::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_refresh("success", 0.42);
//! ```

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            // Data source round trips: 10ms to 30s
            latency_buckets: vec![
                0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Refresh Metrics
// ============================================================================

/// Record a completed refresh cycle.
///
/// # Arguments
///
/// * `outcome` - `"success"`, `"source_error"` or `"timeout"`
/// * `duration_seconds` - Fetch plus computation time in seconds
pub fn record_refresh(outcome: &str, duration_seconds: f64) {
    counter!(
        "dashboard_refresh_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!("dashboard_refresh_duration_seconds").record(duration_seconds);
}

/// Count records the normalizer rejected.
pub fn record_rejected_records(count: usize) {
    if count > 0 {
        counter!("dashboard_rejected_records_total").increment(count as u64);
    }
}

/// Update the number of trades in the published snapshot.
pub fn update_trade_count(count: usize) {
    gauge!("dashboard_trades").set(count as f64);
}

// ============================================================================
// Data Source Metrics
// ============================================================================

/// Record a data source fetch.
///
/// # Arguments
///
/// * `source` - Source name (e.g., `"google_sheets"`, `"supabase"`)
/// * `duration_seconds` - Round-trip time in seconds, retries included
pub fn record_source_fetch(source: &str, duration_seconds: f64) {
    histogram!(
        "dashboard_source_fetch_duration_seconds",
        "source" => source.to_string()
    )
    .record(duration_seconds);
}

/// Record a retried data source request.
pub fn record_source_retry(source: &str) {
    counter!(
        "dashboard_source_retries_total",
        "source" => source.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MetricsConfig::default();
        assert_eq!(config.listen_addr.port(), 9090);
        assert!(!config.latency_buckets.is_empty());
    }

    #[test]
    fn recording_without_exporter_is_noop() {
        record_refresh("success", 0.1);
        record_rejected_records(2);
        update_trade_count(10);
        record_source_fetch("in_memory", 0.01);
        record_source_retry("in_memory");
    }
}
