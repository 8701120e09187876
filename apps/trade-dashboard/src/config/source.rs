//! Trade data source selection.
//!
//! Exactly one source is active; `kind` picks which.

use serde::{Deserialize, Serialize};

use crate::domain::trade::{ColumnLayout, FieldNames};

/// Active trade data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Google Sheets values API.
    GoogleSheets(GoogleSheetsConfig),
    /// Airtable REST API.
    Airtable(AirtableConfig),
    /// Supabase (PostgREST) table.
    Supabase(SupabaseConfig),
    /// The bot's own REST API.
    BotApi(BotApiSourceConfig),
    /// Fixed records, optionally loaded from a JSON file.
    InMemory(InMemorySourceConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::InMemory(InMemorySourceConfig::default())
    }
}

impl SourceConfig {
    /// Source name used in logs and metric labels.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GoogleSheets(_) => "google_sheets",
            Self::Airtable(_) => "airtable",
            Self::Supabase(_) => "supabase",
            Self::BotApi(_) => "bot_api",
            Self::InMemory(_) => "in_memory",
        }
    }
}

/// Google Sheets source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleSheetsConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// Spreadsheet ID.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// A1 range to read.
    #[serde(default = "default_sheet_range")]
    pub range: String,
    /// API base URL.
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    /// Column positions.
    #[serde(default)]
    pub columns: ColumnLayout,
}

/// Airtable source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirtableConfig {
    /// Personal access token.
    #[serde(default)]
    pub api_key: String,
    /// Base ID.
    #[serde(default)]
    pub base_id: String,
    /// Table name or ID.
    #[serde(default = "default_airtable_table")]
    pub table: String,
    /// API base URL.
    #[serde(default = "default_airtable_base_url")]
    pub base_url: String,
    /// Records per page (Airtable caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Upper bound on records fetched per refresh.
    #[serde(default = "default_max_records")]
    pub max_records: u32,
    /// Field names.
    #[serde(default = "FieldNames::airtable")]
    pub fields: FieldNames,
}

/// Supabase source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL.
    #[serde(default)]
    pub url: String,
    /// Anon or service key.
    #[serde(default)]
    pub api_key: String,
    /// Table name.
    #[serde(default = "default_supabase_table")]
    pub table: String,
    /// Row limit per refresh.
    #[serde(default = "default_max_records")]
    pub limit: u32,
    /// Column names.
    #[serde(default = "FieldNames::supabase")]
    pub fields: FieldNames,
}

/// Bot REST API source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotApiSourceConfig {
    /// Bot base URL.
    #[serde(default)]
    pub base_url: String,
    /// Path of the trades endpoint.
    #[serde(default = "default_trades_path")]
    pub path: String,
    /// Field names.
    #[serde(default = "FieldNames::bot_api")]
    pub fields: FieldNames,
}

/// In-memory source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySourceConfig {
    /// JSON file holding an array of trade objects (bot API field names).
    #[serde(default)]
    pub fixture_path: Option<String>,
}

fn default_sheet_range() -> String {
    "Sheet1!A:Z".to_string()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_airtable_table() -> String {
    "Trading Bot".to_string()
}

fn default_airtable_base_url() -> String {
    "https://api.airtable.com".to_string()
}

const fn default_page_size() -> u32 {
    100
}

const fn default_max_records() -> u32 {
    1000
}

fn default_supabase_table() -> String {
    "trade_data".to_string()
}

fn default_trades_path() -> String {
    "/trades".to_string()
}
