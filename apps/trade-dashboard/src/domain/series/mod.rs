//! Chart series derived from trades: equity curve, cumulative ROI,
//! drawdown, pnl histogram, streaks and the monthly breakdown.

mod builder;
mod distribution;
mod drawdown;
mod monthly;
mod streaks;
mod types;

pub use builder::SeriesBuilder;
pub use distribution::{DEFAULT_BUCKET_WIDTH, profit_distribution};
pub use drawdown::{drawdown_series, drawdowns, max_drawdown};
pub use monthly::monthly_breakdown;
pub use streaks::{current_streak, max_consecutive};
pub use types::{
    DistributionBucket, DrawdownPoint, EquityPoint, MaxStreaks, MonthlySummary, RoiPoint, Streak,
    StreakKind, TradeSeries,
};
