//! Observability module for metrics.
//!
//! Prometheus export of refresh and data source instrumentation. Tracing
//! setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_refresh, record_rejected_records,
    record_source_fetch, record_source_retry, update_trade_count,
};
