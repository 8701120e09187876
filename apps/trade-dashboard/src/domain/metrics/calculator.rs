//! Metrics calculator over canonical trades.

use rust_decimal::Decimal;

use super::constants::{DEFAULT_STOP_LOSS, HUNDRED, TRADING_DAYS};
use super::math::{mean, population_std_dev, ratio, sqrt_decimal};
use super::types::TradingMetrics;
use crate::domain::series::{max_consecutive, max_drawdown};
use crate::domain::trade::{Trade, sort_chronologically};

/// Computes a [`TradingMetrics`] snapshot from a list of trades.
///
/// Pure: the same trades always produce the same metrics, in any input order.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    default_stop_loss: Decimal,
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_STOP_LOSS)
    }
}

impl MetricsCalculator {
    /// Create a calculator reporting `default_stop_loss` when trades carry none.
    #[must_use]
    pub const fn new(default_stop_loss: Decimal) -> Self {
        Self { default_stop_loss }
    }

    /// Stop loss reported when the newest trade has no trailing stop.
    #[must_use]
    pub const fn default_stop_loss(&self) -> Decimal {
        self.default_stop_loss
    }

    /// Calculate all metrics.
    ///
    /// Never fails; an empty list yields [`TradingMetrics::empty`].
    #[must_use]
    pub fn calculate(&self, trades: &[Trade]) -> TradingMetrics {
        if trades.is_empty() {
            return TradingMetrics::empty(self.default_stop_loss);
        }

        let mut ordered = trades.to_vec();
        sort_chronologically(&mut ordered);

        let pnls: Vec<Decimal> = ordered.iter().filter_map(|t| t.pnl_percentage).collect();
        let (gross_profit, gross_loss, winning_trades, losing_trades) = trade_stats(&pnls);
        let total_trades = pnls.len() as u64;

        let win_rate = if total_trades > 0 {
            ratio(Decimal::from(winning_trades) * HUNDRED, Decimal::from(total_trades))
        } else {
            Decimal::ZERO
        };

        let average_win = if winning_trades > 0 {
            ratio(gross_profit, Decimal::from(winning_trades))
        } else {
            Decimal::ZERO
        };

        let average_loss = if losing_trades > 0 {
            -ratio(gross_loss, Decimal::from(losing_trades))
        } else {
            Decimal::ZERO
        };

        let profit_factor = if gross_loss > Decimal::ZERO {
            ratio(gross_profit, gross_loss)
        } else {
            gross_profit
        };

        let streaks = max_consecutive(&ordered);
        let rois: Vec<Decimal> = ordered.iter().map(|t| t.cumulative_roi).collect();

        let (account_value, stop_loss) = ordered.last().map_or(
            (Decimal::ZERO, self.default_stop_loss),
            |newest| {
                (
                    newest.account_value,
                    newest.trailing_stop.unwrap_or(self.default_stop_loss),
                )
            },
        );

        TradingMetrics {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            average_win,
            average_loss,
            largest_win: pnls.iter().copied().max().unwrap_or(Decimal::ZERO),
            largest_loss: pnls.iter().copied().min().unwrap_or(Decimal::ZERO),
            profit_factor,
            sharpe_ratio: sharpe_ratio(&pnls),
            gross_profit,
            gross_loss,
            max_consecutive_wins: streaks.wins,
            max_consecutive_losses: streaks.losses,
            max_drawdown: max_drawdown(&rois),
            account_value,
            stop_loss,
        }
    }
}

/// Gross sums saturate at `Decimal::MAX`.
fn trade_stats(pnls: &[Decimal]) -> (Decimal, Decimal, u64, u64) {
    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;
    let mut winning = 0u64;
    let mut losing = 0u64;

    for pnl in pnls {
        if *pnl > Decimal::ZERO {
            gross_profit = gross_profit.saturating_add(*pnl);
            winning += 1;
        } else if *pnl < Decimal::ZERO {
            gross_loss = gross_loss.saturating_add(pnl.abs());
            losing += 1;
        }
    }

    (gross_profit, gross_loss, winning, losing)
}

/// Sharpe = mean / population std dev * sqrt(252).
///
/// Zero when the series is too short, flat, or too large to square.
fn sharpe_ratio(pnls: &[Decimal]) -> Decimal {
    let (Some(avg), Some(std)) = (mean(pnls), population_std_dev(pnls)) else {
        return Decimal::ZERO;
    };
    if std == Decimal::ZERO {
        return Decimal::ZERO;
    }

    let annualization = sqrt_decimal(TRADING_DAYS).unwrap_or(Decimal::ONE);
    ratio(avg, std).saturating_mul(annualization)
}
