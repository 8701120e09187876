//! Decimal constants for trade metric calculations.

use rust_decimal::Decimal;

pub const TWO: Decimal = Decimal::TWO;
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
/// Sharpe annualization factor (trading-day convention).
pub const TRADING_DAYS: Decimal = Decimal::from_parts(252, 0, 0, false, 0);
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 7); // 0.0000001
/// Stop loss percentage reported when the source has none.
pub const DEFAULT_STOP_LOSS: Decimal = Decimal::from_parts(25, 0, 0, false, 1); // 2.5
