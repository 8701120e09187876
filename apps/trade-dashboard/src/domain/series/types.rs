//! Chart-ready series types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::Timestamp;

/// Account value after a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    /// Trade close time.
    pub timestamp: Timestamp,
    /// Account value.
    pub account_value: Decimal,
}

/// Cumulative ROI after a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiPoint {
    /// Trade close time.
    pub timestamp: Timestamp,
    /// Cumulative ROI in percent.
    #[serde(rename = "cumulativeROI")]
    pub cumulative_roi: Decimal,
}

/// Drawdown tracking point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    /// Trade close time.
    pub timestamp: Timestamp,
    /// Cumulative ROI at this trade.
    #[serde(rename = "cumulativeROI")]
    pub cumulative_roi: Decimal,
    /// Running peak of cumulative ROI so far.
    pub peak: Decimal,
    /// Decline from the peak in percent (<= 0).
    pub drawdown: Decimal,
}

/// One histogram bin of realized pnl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    /// Inclusive lower bound.
    pub lower_bound: Decimal,
    /// Exclusive upper bound.
    pub upper_bound: Decimal,
    /// Trades in the bin.
    pub count: u64,
}

/// Direction of a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakKind {
    /// Consecutive winners.
    Win,
    /// Consecutive losers.
    Loss,
    /// No streak.
    #[default]
    None,
}

/// Run of same-sign trades ending at the most recent trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Direction.
    pub kind: StreakKind,
    /// Number of trades in the run.
    pub length: u64,
}

/// Longest historical runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaxStreaks {
    /// Longest run of winners.
    pub wins: u64,
    /// Longest run of losers.
    pub losses: u64,
}

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Month as `YYYY-MM`.
    pub month: String,
    /// Trades with a realized pnl.
    pub trades: u64,
    /// Winners.
    pub winning_trades: u64,
    /// Losers.
    pub losing_trades: u64,
    /// Sum of winning pnl in percent.
    pub gross_profit: Decimal,
    /// Sum of losing pnl magnitudes in percent.
    pub gross_loss: Decimal,
    /// Net pnl in percent.
    pub net_pnl: Decimal,
}

/// Every derived series for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSeries {
    /// Account value per trade, oldest first.
    pub equity_curve: Vec<EquityPoint>,
    /// Cumulative ROI per trade, oldest first.
    #[serde(rename = "cumulativeROI")]
    pub cumulative_roi: Vec<RoiPoint>,
    /// Drawdown from running peak, oldest first.
    pub drawdown: Vec<DrawdownPoint>,
    /// Pnl histogram, ascending by bin.
    pub profit_distribution: Vec<DistributionBucket>,
    /// Streak as of the latest trade.
    pub current_streak: Streak,
    /// Longest historical streaks.
    pub max_streaks: MaxStreaks,
}
