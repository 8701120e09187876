//! Raw record shapes delivered by data sources, and how to read them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One unparsed record as the source returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Spreadsheet row: ordered cells.
    SheetRow(Vec<String>),
    /// API/database row: named, possibly null fields.
    ApiRow(Map<String, Value>),
}

impl RawRecord {
    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SheetRow(_) => "sheet_row",
            Self::ApiRow(_) => "api_row",
        }
    }
}

/// Where each canonical field lives in a spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    /// Close timestamp column.
    pub timestamp: usize,
    /// Symbol column; the configured default symbol is used when absent.
    #[serde(default)]
    pub symbol: Option<usize>,
    /// Entry price column.
    pub entry_price: usize,
    /// Position column.
    pub position: usize,
    /// Close price column.
    pub close_price: usize,
    /// Realized pnl percentage column.
    pub pnl_percentage: usize,
    /// Account value column.
    pub account_value: usize,
    /// Cumulative ROI column; derived from account value when absent.
    #[serde(default)]
    pub cumulative_roi: Option<usize>,
    /// Trailing stop column.
    #[serde(default)]
    pub trailing_stop: Option<usize>,
}

impl Default for ColumnLayout {
    /// The bot's trade log sheet:
    /// `timestamp, price, position, close, pnl, account value, leverage, ...`.
    fn default() -> Self {
        Self {
            timestamp: 0,
            symbol: None,
            entry_price: 1,
            position: 2,
            close_price: 3,
            pnl_percentage: 4,
            account_value: 5,
            cumulative_roi: None,
            trailing_stop: None,
        }
    }
}

/// Field names for each canonical field in an API row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    /// Close timestamp field.
    pub timestamp: String,
    /// Symbol field.
    pub symbol: String,
    /// Entry price field.
    pub entry_price: String,
    /// Position field.
    pub position: String,
    /// Close price field.
    pub close_price: String,
    /// Realized pnl percentage field.
    pub pnl_percentage: String,
    /// Account value field.
    pub account_value: String,
    /// Cumulative ROI field; derived from account value when absent.
    #[serde(default)]
    pub cumulative_roi: Option<String>,
    /// Trailing stop field.
    #[serde(default)]
    pub trailing_stop: Option<String>,
}

impl FieldNames {
    /// Airtable "Trading Bot" table.
    #[must_use]
    pub fn airtable() -> Self {
        Self {
            timestamp: "Timestamp".to_string(),
            symbol: "Symbol".to_string(),
            entry_price: "Entry Price".to_string(),
            position: "Position".to_string(),
            close_price: "Close Price".to_string(),
            pnl_percentage: "PNL Percentage".to_string(),
            account_value: "Account Value".to_string(),
            cumulative_roi: Some("Cumulative ROI".to_string()),
            trailing_stop: Some("Stop Loss".to_string()),
        }
    }

    /// Supabase `trade_data` table.
    #[must_use]
    pub fn supabase() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            symbol: "symbol".to_string(),
            entry_price: "entry_price".to_string(),
            position: "position_type".to_string(),
            close_price: "current_price".to_string(),
            pnl_percentage: "pnl_percent".to_string(),
            account_value: "account_value".to_string(),
            cumulative_roi: Some("cumulative_roi".to_string()),
            trailing_stop: Some("trailing_stop".to_string()),
        }
    }

    /// Trade objects served by the bot's REST API.
    #[must_use]
    pub fn bot_api() -> Self {
        Self {
            timestamp: "timestamp".to_string(),
            symbol: "symbol".to_string(),
            entry_price: "entryPrice".to_string(),
            position: "position".to_string(),
            close_price: "closePrice".to_string(),
            pnl_percentage: "pnlPercentage".to_string(),
            account_value: "accountValue".to_string(),
            cumulative_roi: Some("cumulativeROI".to_string()),
            trailing_stop: Some("trailingStop".to_string()),
        }
    }
}

/// How a source's records map onto the canonical trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    /// Column indices for [`RawRecord::SheetRow`].
    Columns(ColumnLayout),
    /// Field names for [`RawRecord::ApiRow`].
    Fields(FieldNames),
}

/// Records fetched in one cycle, with the mapping needed to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTradeBatch {
    /// Field mapping of the source.
    pub mapping: FieldMapping,
    /// Records in delivery order, oldest first where the source has one.
    pub records: Vec<RawRecord>,
}

impl RawTradeBatch {
    /// Create a batch.
    #[must_use]
    pub const fn new(mapping: FieldMapping, records: Vec<RawRecord>) -> Self {
        Self { mapping, records }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
