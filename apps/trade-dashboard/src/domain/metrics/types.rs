//! Metrics snapshot type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_STOP_LOSS;

/// Performance statistics over one trade snapshot.
///
/// All percentages are expressed in percent (`66.67`, not `0.6667`).
/// Counts and aggregates only consider trades with a realized pnl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingMetrics {
    /// Trades with a realized pnl.
    pub total_trades: u64,
    /// Trades with pnl > 0.
    pub winning_trades: u64,
    /// Trades with pnl < 0.
    pub losing_trades: u64,
    /// `winning / total * 100`.
    pub win_rate: Decimal,
    /// Mean pnl of winning trades.
    pub average_win: Decimal,
    /// Mean pnl of losing trades (negative).
    pub average_loss: Decimal,
    /// Highest pnl.
    pub largest_win: Decimal,
    /// Lowest pnl.
    pub largest_loss: Decimal,
    /// Gross profit over gross loss; gross profit when there are no losses.
    pub profit_factor: Decimal,
    /// Annualized Sharpe ratio of the pnl series.
    pub sharpe_ratio: Decimal,
    /// Sum of winning pnl.
    pub gross_profit: Decimal,
    /// Sum of losing pnl magnitudes (positive).
    pub gross_loss: Decimal,
    /// Longest run of winners.
    pub max_consecutive_wins: u64,
    /// Longest run of losers.
    pub max_consecutive_losses: u64,
    /// Deepest drawdown of cumulative ROI from its running peak (<= 0).
    pub max_drawdown: Decimal,
    /// Account value after the most recent trade.
    pub account_value: Decimal,
    /// Trailing stop percentage.
    pub stop_loss: Decimal,
}

impl TradingMetrics {
    /// All-zero snapshot carrying the given stop loss.
    #[must_use]
    pub const fn empty(stop_loss: Decimal) -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: Decimal::ZERO,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            sharpe_ratio: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            max_consecutive_wins: 0,
            max_consecutive_losses: 0,
            max_drawdown: Decimal::ZERO,
            account_value: Decimal::ZERO,
            stop_loss,
        }
    }
}

impl Default for TradingMetrics {
    fn default() -> Self {
        Self::empty(DEFAULT_STOP_LOSS)
    }
}
