//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

use crate::application::services::RefreshFailure;
use crate::domain::metrics::{TradingMetrics, format_money, format_pct};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Whether a snapshot has been published.
    pub has_snapshot: bool,
    /// Most recent refresh failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RefreshFailure>,
}

/// Headline metrics as display strings, as the stat cards show them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsDisplay {
    /// Win rate, e.g. `"66.67%"`.
    pub win_rate: String,
    /// Account value, e.g. `"$16.04"`.
    pub account_value: String,
    /// Largest win.
    pub largest_win: String,
    /// Largest loss.
    pub largest_loss: String,
    /// Average win.
    pub average_win: String,
    /// Average loss.
    pub average_loss: String,
    /// Stop loss distance.
    pub stop_loss: String,
    /// Maximum drawdown.
    pub max_drawdown: String,
}

impl From<&TradingMetrics> for MetricsDisplay {
    fn from(metrics: &TradingMetrics) -> Self {
        Self {
            win_rate: format_pct(metrics.win_rate),
            account_value: format_money(metrics.account_value),
            largest_win: format_pct(metrics.largest_win),
            largest_loss: format_pct(metrics.largest_loss),
            average_win: format_pct(metrics.average_win),
            average_loss: format_pct(metrics.average_loss),
            stop_loss: format_pct(metrics.stop_loss),
            max_drawdown: format_pct(metrics.max_drawdown),
        }
    }
}

/// Metrics plus their display strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    /// Raw values.
    #[serde(flatten)]
    pub metrics: TradingMetrics,
    /// Formatted values.
    pub display: MetricsDisplay,
}

impl From<TradingMetrics> for MetricsResponse {
    fn from(metrics: TradingMetrics) -> Self {
        let display = MetricsDisplay::from(&metrics);
        Self { metrics, display }
    }
}
