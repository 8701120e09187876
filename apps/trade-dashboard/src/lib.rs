// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Trade Dashboard - Metrics Service Library
//!
//! Backend for the trading bot dashboard: pulls closed trades from one
//! configured data source, turns them into performance metrics and chart
//! series, and serves the result over HTTP.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: pure computation, no I/O
//!   - `trade`: canonical trade record and the raw record normalizer
//!   - `metrics`: win rate, profit factor, Sharpe ratio, streaks, drawdown
//!   - `series`: equity curve, ROI, drawdown, profit histogram, monthly summary
//!   - `export`: CSV download
//!
//! - **Application**: ports, the refresh use case and the refresh loop
//!   - `ports`: `TradeDataSourcePort`, `BotControlPort`
//!   - `use_cases`: `RefreshDashboardUseCase`
//!   - `services`: `SnapshotStore`, `DashboardRefresher`
//!
//! - **Infrastructure**: adapters
//!   - `sources`: Google Sheets, Airtable, Supabase, bot API, in-memory
//!   - `bot`: remote bot control
//!   - `http`: axum REST API
//!   - `container`: dependency wiring from configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Metrics computation with no external dependencies.
pub mod domain;

/// Application layer - Use cases, services and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Ambient
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// API error codes and responses.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber and OpenTelemetry export.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::metrics::{MetricsCalculator, TradingMetrics};
pub use domain::series::{SeriesBuilder, TradeSeries};
pub use domain::shared::{Symbol, Timestamp};
pub use domain::trade::{Position, RawRecord, RawTradeBatch, Trade, TradeNormalizer};

pub use application::ports::{BotControlPort, TradeDataSourcePort};
pub use application::services::{DashboardRefresher, SnapshotStore};
pub use application::use_cases::{DashboardSnapshot, RefreshDashboardUseCase, RefreshError};

pub use infrastructure::container::Container;
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::sources::{ConfiguredSource, InMemoryTradeSource};
