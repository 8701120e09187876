//! Google Sheets values API adapter.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use super::endpoint_url;
use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::config::GoogleSheetsConfig;
use crate::domain::trade::{FieldMapping, RawRecord, RawTradeBatch};
use crate::infrastructure::http_client::RetryingHttpClient;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads trade rows from one sheet range.
#[derive(Debug, Clone)]
pub struct GoogleSheetsSource {
    client: RetryingHttpClient,
    config: GoogleSheetsConfig,
    skip_header_row: bool,
}

impl GoogleSheetsSource {
    /// Create the adapter.
    #[must_use]
    pub const fn new(
        client: RetryingHttpClient,
        config: GoogleSheetsConfig,
        skip_header_row: bool,
    ) -> Self {
        Self {
            client,
            config,
            skip_header_row,
        }
    }

    fn values_url(&self) -> Result<String, DataSourceError> {
        endpoint_url(
            &self.config.base_url,
            &[
                "v4",
                "spreadsheets",
                &self.config.spreadsheet_id,
                "values",
                &self.config.range,
            ],
        )
    }
}

/// Render a sheet cell as the text the normalizer parses.
fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TradeDataSourcePort for GoogleSheetsSource {
    fn name(&self) -> &'static str {
        "google_sheets"
    }

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::Columns(self.config.columns.clone())
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        let url = self.values_url()?;
        let range: ValueRange = self
            .client
            .get_json(&url, &HeaderMap::new(), &[("key", self.config.api_key.clone())])
            .await?;

        let skip = usize::from(self.skip_header_row);
        let records: Vec<RawRecord> = range
            .values
            .into_iter()
            .skip(skip)
            .filter(|row| !row.is_empty())
            .map(|row| RawRecord::SheetRow(row.into_iter().map(cell_text).collect()))
            .collect();

        tracing::debug!(rows = records.len(), range = %self.config.range, "Fetched sheet rows");
        Ok(RawTradeBatch::new(self.field_mapping(), records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::domain::trade::ColumnLayout;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(base_url: String, skip_header_row: bool) -> GoogleSheetsSource {
        let client = RetryingHttpClient::new(
            Duration::from_secs(5),
            RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
            "google_sheets",
        )
        .unwrap();
        GoogleSheetsSource::new(
            client,
            GoogleSheetsConfig {
                api_key: "key-123".to_string(),
                spreadsheet_id: "sheet-abc".to_string(),
                range: "Sheet1!A:Z".to_string(),
                base_url,
                columns: ColumnLayout::default(),
            },
            skip_header_row,
        )
    }

    #[tokio::test]
    async fn fetches_rows_and_skips_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/sheet-abc/values/Sheet1!A:Z"))
            .and(query_param("key", "key-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "range": "Sheet1!A1:F3",
                "majorDimension": "ROWS",
                "values": [
                    ["Timestamp", "Entry Price", "Position", "Close Price", "PNL %", "Account Value"],
                    ["2024-01-15 10:00:00", "100", "Long", "101.5", "1.5", 15.2],
                    [],
                    ["2024-01-16 10:00:00", "101", "Short", "", null]
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let batch = source(server.uri(), true).fetch_records().await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.records[0],
            RawRecord::SheetRow(vec![
                "2024-01-15 10:00:00".to_string(),
                "100".to_string(),
                "Long".to_string(),
                "101.5".to_string(),
                "1.5".to_string(),
                "15.2".to_string(),
            ])
        );
        let RawRecord::SheetRow(short_row) = &batch.records[1] else {
            panic!("expected sheet row");
        };
        assert_eq!(short_row.len(), 5);
        assert_eq!(short_row[4], "");
        assert_eq!(batch.mapping, FieldMapping::Columns(ColumnLayout::default()));
    }

    #[tokio::test]
    async fn empty_sheet_has_no_values_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"range": "Sheet1!A:Z"})))
            .mount(&server)
            .await;

        let batch = source(server.uri(), false).fetch_records().await.unwrap();
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn forbidden_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let Err(err) = source(server.uri(), true).fetch_records().await else {
            panic!("expected authentication failure");
        };
        assert!(matches!(err, DataSourceError::Authentication { .. }));
    }

    #[test]
    fn cell_text_renders_scalars() {
        assert_eq!(cell_text(json!("abc")), "abc");
        assert_eq!(cell_text(json!(1.25)), "1.25");
        assert_eq!(cell_text(json!(true)), "true");
        assert_eq!(cell_text(Value::Null), "");
    }
}
