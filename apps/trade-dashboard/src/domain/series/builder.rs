//! Assembles every derived series from one trade snapshot.

use rust_decimal::Decimal;

use super::distribution::{DEFAULT_BUCKET_WIDTH, profit_distribution};
use super::drawdown::drawdown_series;
use super::streaks::{current_streak, max_consecutive};
use super::types::{EquityPoint, RoiPoint, TradeSeries};
use crate::domain::trade::{Trade, sort_chronologically};

/// Derives chart series from trades in any order.
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    bucket_width: Decimal,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_WIDTH)
    }
}

impl SeriesBuilder {
    /// Create a builder with the given histogram bin width.
    #[must_use]
    pub const fn new(bucket_width: Decimal) -> Self {
        Self { bucket_width }
    }

    /// Derive all series. Sorts a copy of the trades oldest first.
    #[must_use]
    pub fn derive(&self, trades: &[Trade]) -> TradeSeries {
        let mut ordered = trades.to_vec();
        sort_chronologically(&mut ordered);

        TradeSeries {
            equity_curve: ordered
                .iter()
                .map(|t| EquityPoint {
                    timestamp: t.timestamp,
                    account_value: t.account_value,
                })
                .collect(),
            cumulative_roi: ordered
                .iter()
                .map(|t| RoiPoint {
                    timestamp: t.timestamp,
                    cumulative_roi: t.cumulative_roi,
                })
                .collect(),
            drawdown: drawdown_series(&ordered),
            profit_distribution: profit_distribution(&ordered, self.bucket_width),
            current_streak: current_streak(&ordered),
            max_streaks: max_consecutive(&ordered),
        }
    }
}
