//! Trade performance metrics.
//!
//! Implements the dashboard statistics:
//! - Win rate over trades with a realized pnl
//! - Profit factor (gross profit / gross loss)
//! - Sharpe ratio (population std dev, 252-day annualization)
//! - Average and extreme wins/losses
//! - Longest streaks and deepest drawdown

mod calculator;
mod constants;
mod format;
mod math;
mod types;

pub use calculator::MetricsCalculator;
pub use constants::{DEFAULT_STOP_LOSS, TRADING_DAYS};
pub use format::{format_decimal, format_money, format_pct};
pub use math::{mean, population_std_dev, ratio, sqrt_decimal};
pub use types::TradingMetrics;
