//! Canonical trade record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::domain::shared::{Symbol, Timestamp};

/// A closed (or still open) trade in canonical form.
///
/// Every data source is normalized into this shape before any metric
/// or series is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// When the trade closed; the ordering key.
    pub timestamp: Timestamp,
    /// Traded instrument.
    pub symbol: Symbol,
    /// Position direction.
    pub position: Position,
    /// Entry price.
    pub entry_price: Decimal,
    /// Close price.
    pub close_price: Decimal,
    /// Realized return in percent. `None` while the position is still open.
    pub pnl_percentage: Option<Decimal>,
    /// Running return since account inception, in percent.
    #[serde(rename = "cumulativeROI")]
    pub cumulative_roi: Decimal,
    /// Account equity right after the trade closed.
    pub account_value: Decimal,
    /// Trailing stop percentage reported by the source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_stop: Option<Decimal>,
}

impl Trade {
    /// Whether the trade carries a realized pnl.
    #[must_use]
    pub const fn has_pnl(&self) -> bool {
        self.pnl_percentage.is_some()
    }

    /// Realized pnl, or zero for open trades.
    #[must_use]
    pub fn pnl_or_zero(&self) -> Decimal {
        self.pnl_percentage.unwrap_or(Decimal::ZERO)
    }

    /// Check if this trade was profitable.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.pnl_percentage.is_some_and(|p| p > Decimal::ZERO)
    }

    /// Check if this trade lost money.
    #[must_use]
    pub fn is_loser(&self) -> bool {
        self.pnl_percentage.is_some_and(|p| p < Decimal::ZERO)
    }
}

/// Sort trades ascending by close time.
///
/// Every ordered computation goes through this first. The sort is
/// stable, so trades sharing a timestamp (date-only sheet rows, say)
/// keep their delivery order. Adapters that query newest first reverse
/// their batch, which keeps ties oldest first here too.
pub fn sort_chronologically(trades: &mut [Trade]) {
    trades.sort_by_key(|t| t.timestamp);
}
