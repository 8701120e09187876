//! Drawdown of cumulative ROI from its running peak.

use rust_decimal::Decimal;

use super::types::DrawdownPoint;
use crate::domain::metrics::ratio;
use crate::domain::trade::Trade;

/// Running peak and drawdown percentage for each value, in order.
///
/// The peak starts at the first value. A zero peak yields a zero drawdown.
/// The peak magnitude is the divisor so every drawdown is `<= 0`, also
/// when cumulative ROI is negative.
pub fn drawdowns(values: &[Decimal]) -> Vec<(Decimal, Decimal)> {
    let mut out = Vec::with_capacity(values.len());
    let mut peak: Option<Decimal> = None;

    for value in values {
        let current_peak = peak.map_or(*value, |p| p.max(*value));
        peak = Some(current_peak);

        let drawdown = if current_peak.is_zero() {
            Decimal::ZERO
        } else {
            ratio(value.saturating_sub(current_peak), current_peak.abs())
                .saturating_mul(Decimal::ONE_HUNDRED)
        };
        out.push((current_peak, drawdown));
    }

    out
}

/// Deepest drawdown (most negative), or zero.
pub fn max_drawdown(values: &[Decimal]) -> Decimal {
    drawdowns(values)
        .into_iter()
        .map(|(_, dd)| dd)
        .min()
        .unwrap_or(Decimal::ZERO)
        .min(Decimal::ZERO)
}

/// Drawdown series for trades already sorted oldest first.
pub fn drawdown_series(trades: &[Trade]) -> Vec<DrawdownPoint> {
    let rois: Vec<Decimal> = trades.iter().map(|t| t.cumulative_roi).collect();

    trades
        .iter()
        .zip(drawdowns(&rois))
        .map(|(trade, (peak, drawdown))| DrawdownPoint {
            timestamp: trade.timestamp,
            cumulative_roi: trade.cumulative_roi,
            peak,
            drawdown,
        })
        .collect()
}
