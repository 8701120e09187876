//! Per-month breakdown for the accounting report.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::types::MonthlySummary;
use crate::domain::trade::Trade;

/// Totals per UTC calendar month present in the data, ascending.
pub fn monthly_breakdown(trades: &[Trade]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<String, MonthlySummary> = BTreeMap::new();

    for trade in trades {
        let month = trade.timestamp.as_datetime().format("%Y-%m").to_string();
        let entry = months.entry(month.clone()).or_insert_with(|| MonthlySummary {
            month,
            trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            net_pnl: Decimal::ZERO,
        });

        let Some(pnl) = trade.pnl_percentage else {
            continue;
        };
        entry.trades += 1;
        entry.net_pnl = entry.net_pnl.saturating_add(pnl);
        if pnl > Decimal::ZERO {
            entry.winning_trades += 1;
            entry.gross_profit = entry.gross_profit.saturating_add(pnl);
        } else if pnl < Decimal::ZERO {
            entry.losing_trades += 1;
            entry.gross_loss = entry.gross_loss.saturating_add(pnl.abs());
        }
    }

    months.into_values().collect()
}
