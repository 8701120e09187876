//! Trade record normalizer.
//!
//! Maps one raw record from any source onto the canonical [`Trade`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::errors::NormalizeError;
use super::parse::{
    bounded, decimal_from_json, non_negative_from_json, optional_decimal_from_json,
    parse_decimal_lenient, parse_non_negative, text_from_json, timestamp_from_json,
};
use super::position::Position;
use super::raw::{ColumnLayout, FieldMapping, FieldNames, RawRecord, RawTradeBatch};
use super::record::Trade;
use crate::domain::shared::{Symbol, Timestamp};

/// Starting balance of the bot account the sheet layout was built for.
pub const DEFAULT_INITIAL_ACCOUNT_VALUE: Decimal = dec!(14.58);

/// Symbol used when a source does not report one.
pub const DEFAULT_SYMBOL: &str = "SOL";

/// Settings that fill in what a source does not report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    /// Symbol for records without one.
    pub default_symbol: Symbol,
    /// Account value at inception; base for derived cumulative ROI.
    pub initial_account_value: Decimal,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            default_symbol: Symbol::new(DEFAULT_SYMBOL),
            initial_account_value: DEFAULT_INITIAL_ACCOUNT_VALUE,
        }
    }
}

/// A record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    /// Position of the record in the fetched batch.
    pub index: usize,
    /// Human readable reason.
    pub reason: String,
}

/// Output of [`TradeNormalizer::normalize_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    /// Accepted trades in delivery order (not yet sorted).
    pub trades: Vec<Trade>,
    /// Records excluded from the batch.
    pub rejected: Vec<RejectedRecord>,
}

/// Converts raw source records into canonical trades.
#[derive(Debug, Clone, Default)]
pub struct TradeNormalizer {
    options: NormalizerOptions,
}

impl TradeNormalizer {
    /// Create a normalizer with the given options.
    #[must_use]
    pub const fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    #[must_use]
    pub const fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalize a single record.
    ///
    /// # Errors
    ///
    /// Fails when the timestamp is missing or unparseable, or when the
    /// record shape does not match the mapping. Malformed numeric fields
    /// never fail; they become zero.
    pub fn normalize(
        &self,
        record: &RawRecord,
        mapping: &FieldMapping,
    ) -> Result<Trade, NormalizeError> {
        match (record, mapping) {
            (RawRecord::SheetRow(cells), FieldMapping::Columns(layout)) => {
                self.from_sheet_row(cells, layout)
            }
            (RawRecord::ApiRow(row), FieldMapping::Fields(names)) => self.from_api_row(row, names),
            (record, mapping) => Err(NormalizeError::MappingMismatch {
                record: record.kind(),
                mapping: match mapping {
                    FieldMapping::Columns(_) => "column",
                    FieldMapping::Fields(_) => "field-name",
                },
            }),
        }
    }

    /// Normalize every record of a batch.
    ///
    /// A rejected record is logged and reported; it never aborts the batch.
    pub fn normalize_batch(&self, batch: &RawTradeBatch) -> NormalizedBatch {
        let mut out = NormalizedBatch {
            trades: Vec::with_capacity(batch.len()),
            rejected: Vec::new(),
        };

        for (index, record) in batch.records.iter().enumerate() {
            match self.normalize(record, &batch.mapping) {
                Ok(trade) => out.trades.push(trade),
                Err(err) => {
                    warn!(index, kind = record.kind(), error = %err, "Rejected trade record");
                    out.rejected.push(RejectedRecord {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        out
    }

    fn from_sheet_row(
        &self,
        cells: &[String],
        layout: &ColumnLayout,
    ) -> Result<Trade, NormalizeError> {
        let cell = |index: usize| cells.get(index).map_or("", |c| c.as_str());

        let raw_ts = cell(layout.timestamp).trim();
        if raw_ts.is_empty() {
            return Err(NormalizeError::MissingTimestamp);
        }
        let timestamp =
            Timestamp::parse_flexible(raw_ts).ok_or_else(|| NormalizeError::InvalidTimestamp {
                raw: raw_ts.to_string(),
            })?;

        let symbol = layout
            .symbol
            .map(|i| Symbol::new(cell(i)))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.options.default_symbol.clone());

        let account_value = parse_non_negative(cell(layout.account_value));
        let cumulative_roi = layout.cumulative_roi.map_or_else(
            || self.derive_cumulative_roi(account_value),
            |i| parse_decimal_lenient(cell(i)),
        );
        let trailing_stop = layout
            .trailing_stop
            .map(cell)
            .filter(|c| !c.trim().is_empty())
            .map(parse_decimal_lenient);

        Ok(Trade {
            timestamp,
            symbol,
            position: Position::parse(cell(layout.position)),
            entry_price: parse_non_negative(cell(layout.entry_price)),
            close_price: parse_non_negative(cell(layout.close_price)),
            pnl_percentage: Some(parse_decimal_lenient(cell(layout.pnl_percentage))),
            cumulative_roi,
            account_value,
            trailing_stop,
        })
    }

    fn from_api_row(
        &self,
        row: &Map<String, Value>,
        names: &FieldNames,
    ) -> Result<Trade, NormalizeError> {
        let field = |name: &str| row.get(name).unwrap_or(&Value::Null);

        let raw_ts = match row.get(&names.timestamp) {
            None | Some(Value::Null) => return Err(NormalizeError::MissingTimestamp),
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(NormalizeError::MissingTimestamp);
            }
            Some(v) => v,
        };
        let timestamp =
            timestamp_from_json(raw_ts).ok_or_else(|| NormalizeError::InvalidTimestamp {
                raw: match raw_ts {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })?;

        let symbol = text_from_json(row.get(&names.symbol))
            .map(Symbol::new)
            .unwrap_or_else(|| self.options.default_symbol.clone());

        let position = text_from_json(row.get(&names.position))
            .map_or(Position::None, |p| Position::parse(&p));

        let account_value = non_negative_from_json(field(&names.account_value));
        let cumulative_roi = names.cumulative_roi.as_deref().map_or_else(
            || self.derive_cumulative_roi(account_value),
            |name| decimal_from_json(field(name)),
        );
        let trailing_stop = names
            .trailing_stop
            .as_deref()
            .and_then(|name| optional_decimal_from_json(row.get(name)));

        Ok(Trade {
            timestamp,
            symbol,
            position,
            entry_price: non_negative_from_json(field(&names.entry_price)),
            close_price: non_negative_from_json(field(&names.close_price)),
            pnl_percentage: optional_decimal_from_json(row.get(&names.pnl_percentage)),
            cumulative_roi,
            account_value,
            trailing_stop,
        })
    }

    fn derive_cumulative_roi(&self, account_value: Decimal) -> Decimal {
        let initial = self.options.initial_account_value;
        if initial <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        account_value
            .checked_sub(initial)
            .and_then(|gain| gain.checked_div(initial))
            .and_then(|fraction| fraction.checked_mul(Decimal::ONE_HUNDRED))
            .map_or(Decimal::ZERO, bounded)
    }
}
