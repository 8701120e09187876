//! Refresh Dashboard Use Case
//!
//! Fetch raw records, normalize, sort, aggregate and derive series as one
//! unit. The result is a complete snapshot or an error, never a mix.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::domain::metrics::{MetricsCalculator, TradingMetrics, format_pct};
use crate::domain::series::{MonthlySummary, SeriesBuilder, TradeSeries, monthly_breakdown};
use crate::domain::shared::Timestamp;
use crate::domain::trade::{
    RawTradeBatch, RejectedRecord, Trade, TradeNormalizer, sort_chronologically,
};
use crate::observability;

/// Default upper bound for one data source fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Everything the dashboard displays, computed from one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Source the trades came from.
    pub source: String,
    /// When the snapshot was computed.
    pub generated_at: Timestamp,
    /// Canonical trades, oldest first.
    pub trades: Vec<Trade>,
    /// Performance statistics.
    pub metrics: TradingMetrics,
    /// Chart series.
    pub series: TradeSeries,
    /// Per-month totals.
    pub monthly: Vec<MonthlySummary>,
    /// Records dropped during normalization.
    pub rejected_records: Vec<RejectedRecord>,
}

/// Refresh errors. Only the fetch can fail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// Data source returned an error.
    #[error("fetch failed: {0}")]
    Fetch(#[from] DataSourceError),

    /// Data source did not answer in time.
    #[error("data source did not answer within {secs}s")]
    TimedOut {
        /// Timeout in seconds.
        secs: u64,
    },
}

impl RefreshError {
    /// Label for the refresh outcome metric.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "source_error",
            Self::TimedOut { .. } => "timeout",
        }
    }
}

/// Use case for rebuilding the dashboard snapshot.
pub struct RefreshDashboardUseCase<S>
where
    S: TradeDataSourcePort,
{
    source: Arc<S>,
    normalizer: TradeNormalizer,
    calculator: MetricsCalculator,
    series: SeriesBuilder,
    fetch_timeout: Duration,
}

impl<S> RefreshDashboardUseCase<S>
where
    S: TradeDataSourcePort,
{
    /// Create a new RefreshDashboardUseCase.
    pub fn new(
        source: Arc<S>,
        normalizer: TradeNormalizer,
        calculator: MetricsCalculator,
        series: SeriesBuilder,
    ) -> Self {
        Self {
            source,
            normalizer,
            calculator,
            series,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Bound the data source fetch.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Name of the configured source.
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Fetch and compute a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RefreshError` when the fetch fails or times out. Malformed
    /// records never fail the refresh.
    pub async fn execute(&self) -> Result<DashboardSnapshot, RefreshError> {
        let started = Instant::now();
        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch_records()).await;
        observability::record_source_fetch(self.source.name(), started.elapsed().as_secs_f64());

        let batch = match fetched {
            Ok(result) => result?,
            Err(_) => {
                return Err(RefreshError::TimedOut {
                    secs: self.fetch_timeout.as_secs(),
                });
            }
        };

        Ok(self.build_snapshot(&batch))
    }

    /// Pure part of the refresh: raw batch to snapshot.
    pub fn build_snapshot(&self, batch: &RawTradeBatch) -> DashboardSnapshot {
        let normalized = self.normalizer.normalize_batch(batch);
        let mut trades = normalized.trades;
        sort_chronologically(&mut trades);

        let metrics = self.calculator.calculate(&trades);
        let series = self.series.derive(&trades);
        let monthly = monthly_breakdown(&trades);

        tracing::debug!(
            source = self.source.name(),
            records = batch.len(),
            trades = trades.len(),
            rejected = normalized.rejected.len(),
            win_rate = %format_pct(metrics.win_rate),
            "Built dashboard snapshot"
        );

        DashboardSnapshot {
            source: self.source.name().to_string(),
            generated_at: Timestamp::now(),
            trades,
            metrics,
            series,
            monthly,
            rejected_records: normalized.rejected,
        }
    }
}
