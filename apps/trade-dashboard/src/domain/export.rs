//! CSV export of canonical trades.

use csv::{Terminator, WriterBuilder};
use thiserror::Error;

use crate::domain::metrics::format_decimal;
use crate::domain::trade::{Trade, sort_chronologically};

const HEADER: [&str; 10] = [
    "Date",
    "Symbol",
    "Position",
    "Entry Price",
    "Close Price",
    "Size",
    "P&L %",
    "Net P&L",
    "Account Value",
    "Cumulative ROI",
];

/// Failure while writing the export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),

    /// The written bytes were not UTF-8.
    #[error("csv output is not utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Export trades, oldest first, in the dashboard's download layout.
///
/// `Size` is the account value and `Net P&L` is
/// `(close - entry) * account value`, saturating at the `Decimal` range.
/// Open trades export a zero pnl. Rows end in `\n`; fields holding a
/// separator, quote or line break are quoted.
pub fn trades_to_csv(trades: &[Trade]) -> Result<String, ExportError> {
    let mut ordered = trades.to_vec();
    sort_chronologically(&mut ordered);

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::with_capacity(128 + ordered.len() * 96));
    writer.write_record(HEADER)?;

    for trade in &ordered {
        let net_pnl = trade
            .close_price
            .saturating_sub(trade.entry_price)
            .saturating_mul(trade.account_value);
        writer.write_record([
            trade.timestamp.date_string(),
            trade.symbol.as_str().to_string(),
            trade.position.to_string(),
            format_decimal(trade.entry_price),
            format_decimal(trade.close_price),
            format_decimal(trade.account_value),
            format_decimal(trade.pnl_or_zero()),
            format_decimal(net_pnl),
            format_decimal(trade.account_value),
            format_decimal(trade.cumulative_roi),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
