//! Profit distribution histogram.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::DistributionBucket;
use crate::domain::trade::Trade;

/// Bin width in percentage points.
pub const DEFAULT_BUCKET_WIDTH: Decimal = Decimal::TWO;

/// Bucket realized pnl into fixed-width bins keyed by lower bound.
///
/// Only non-empty bins are returned, ascending. Open trades are skipped.
/// A non-positive width falls back to [`DEFAULT_BUCKET_WIDTH`]. Bounds
/// saturate at the edges of the `Decimal` range.
pub fn profit_distribution(trades: &[Trade], width: Decimal) -> Vec<DistributionBucket> {
    let width = if width > Decimal::ZERO {
        width
    } else {
        DEFAULT_BUCKET_WIDTH
    };

    let mut bins: BTreeMap<Decimal, u64> = BTreeMap::new();
    for pnl in trades.iter().filter_map(|t| t.pnl_percentage) {
        let lower = pnl
            .checked_div(width)
            .map_or(pnl, |steps| steps.floor().saturating_mul(width))
            .normalize();
        *bins.entry(lower).or_default() += 1;
    }

    bins.into_iter()
        .map(|(lower_bound, count)| DistributionBucket {
            lower_bound,
            upper_bound: lower_bound.saturating_add(width).normalize(),
            count,
        })
        .collect()
}
