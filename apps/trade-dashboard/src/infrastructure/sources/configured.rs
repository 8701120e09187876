//! Config-selected trade source.

use async_trait::async_trait;

use super::{AirtableSource, BotApiSource, GoogleSheetsSource, InMemoryTradeSource, SupabaseSource};
use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::config::{Config, SourceConfig};
use crate::domain::trade::{FieldMapping, RawTradeBatch};
use crate::infrastructure::http_client::RetryingHttpClient;

/// The one data source chosen by `source.kind`.
#[derive(Debug)]
pub enum ConfiguredSource {
    /// Google Sheets values API.
    GoogleSheets(GoogleSheetsSource),
    /// Airtable REST API.
    Airtable(AirtableSource),
    /// Supabase table.
    Supabase(SupabaseSource),
    /// Bot REST API.
    BotApi(BotApiSource),
    /// Fixed records.
    InMemory(InMemoryTradeSource),
}

impl ConfiguredSource {
    /// Build the adapter named by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, DataSourceError> {
        let client = |label: &'static str| {
            RetryingHttpClient::from_config(&config.http, label).map_err(DataSourceError::from)
        };

        let source = match &config.source {
            SourceConfig::GoogleSheets(c) => Self::GoogleSheets(GoogleSheetsSource::new(
                client("google_sheets")?,
                c.clone(),
                config.normalization.skip_header_row,
            )),
            SourceConfig::Airtable(c) => {
                Self::Airtable(AirtableSource::new(client("airtable")?, c.clone()))
            }
            SourceConfig::Supabase(c) => {
                Self::Supabase(SupabaseSource::new(client("supabase")?, c.clone()))
            }
            SourceConfig::BotApi(c) => Self::BotApi(BotApiSource::new(client("bot_api")?, c.clone())),
            SourceConfig::InMemory(c) => Self::InMemory(match &c.fixture_path {
                Some(path) => InMemoryTradeSource::from_fixture_file(path)?,
                None => InMemoryTradeSource::empty(),
            }),
        };

        tracing::info!(source = source.name(), "Trade data source configured");
        Ok(source)
    }

    fn inner(&self) -> &dyn TradeDataSourcePort {
        match self {
            Self::GoogleSheets(s) => s,
            Self::Airtable(s) => s,
            Self::Supabase(s) => s,
            Self::BotApi(s) => s,
            Self::InMemory(s) => s,
        }
    }
}

#[async_trait]
impl TradeDataSourcePort for ConfiguredSource {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn field_mapping(&self) -> FieldMapping {
        self.inner().field_mapping()
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        self.inner().fetch_records().await
    }
}
