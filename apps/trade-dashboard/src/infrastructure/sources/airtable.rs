//! Airtable REST adapter.
//!
//! Pages through the table newest first, following Airtable's `offset`
//! cursor until the table is exhausted or `max_records` rows are collected.
//! The batch is handed over oldest first.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::endpoint_url;
use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::config::AirtableConfig;
use crate::domain::trade::{FieldMapping, RawRecord, RawTradeBatch};
use crate::infrastructure::http_client::RetryingHttpClient;

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<AirtableRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Reads trade records from an Airtable table.
#[derive(Debug, Clone)]
pub struct AirtableSource {
    client: RetryingHttpClient,
    config: AirtableConfig,
}

impl AirtableSource {
    /// Create the adapter.
    #[must_use]
    pub const fn new(client: RetryingHttpClient, config: AirtableConfig) -> Self {
        Self { client, config }
    }

    fn headers(&self) -> Result<HeaderMap, DataSourceError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.trim()))
            .map_err(|_| DataSourceError::Authentication {
                message: "api key contains invalid header characters".to_string(),
            })?;
        headers.insert(AUTHORIZATION, token);
        Ok(headers)
    }

    fn page_query(&self, offset: Option<&str>) -> Vec<(&'static str, String)> {
        let timestamp_field = &self.config.fields.timestamp;
        let mut query = vec![
            ("pageSize", self.config.page_size.to_string()),
            ("maxRecords", self.config.max_records.to_string()),
            ("sort[0][field]", timestamp_field.clone()),
            ("sort[0][direction]", "desc".to_string()),
            ("filterByFormula", format!("NOT({{{timestamp_field}}} = \"\")")),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}

#[async_trait]
impl TradeDataSourcePort for AirtableSource {
    fn name(&self) -> &'static str {
        "airtable"
    }

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::Fields(self.config.fields.clone())
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        let url = endpoint_url(
            &self.config.base_url,
            &["v0", &self.config.base_id, &self.config.table],
        )?;
        let headers = self.headers()?;
        let max_records = self.config.max_records as usize;

        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0_u32;

        loop {
            let page: RecordPage = self
                .client
                .get_json(&url, &headers, &self.page_query(offset.as_deref()))
                .await?;
            pages += 1;

            records.extend(
                page.records
                    .into_iter()
                    .map(|record| RawRecord::ApiRow(record.fields)),
            );

            match page.offset {
                Some(next) if records.len() < max_records => offset = Some(next),
                _ => break,
            }
        }

        records.truncate(max_records);
        records.reverse();
        tracing::debug!(records = records.len(), pages, table = %self.config.table, "Fetched Airtable records");
        Ok(RawTradeBatch::new(self.field_mapping(), records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::domain::trade::FieldNames;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(base_url: String, max_records: u32) -> AirtableSource {
        let client = RetryingHttpClient::new(
            Duration::from_secs(5),
            RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
            "airtable",
        )
        .unwrap();
        AirtableSource::new(
            client,
            AirtableConfig {
                api_key: "pat-secret".to_string(),
                base_id: "appBase".to_string(),
                table: "Trading Bot".to_string(),
                base_url,
                page_size: 2,
                max_records,
                fields: FieldNames::airtable(),
            },
        )
    }

    fn record(ts: &str, pnl: f64) -> Value {
        json!({
            "id": format!("rec{ts}"),
            "createdTime": ts,
            "fields": {"Timestamp": ts, "PNL Percentage": pnl}
        })
    }

    #[tokio::test]
    async fn follows_offset_pagination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/Trading%20Bot"))
            .and(header("authorization", "Bearer pat-secret"))
            .and(query_param("offset", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [record("2024-01-01T00:00:00Z", -1.0)]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v0/appBase/Trading%20Bot"))
            .and(query_param("pageSize", "2"))
            .and(query_param("sort[0][field]", "Timestamp"))
            .and(query_param("sort[0][direction]", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    record("2024-01-03T00:00:00Z", 2.0),
                    record("2024-01-02T00:00:00Z", 1.0)
                ],
                "offset": "page2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let batch = source(server.uri(), 100).fetch_records().await.unwrap();

        assert_eq!(batch.len(), 3);
        let timestamps: Vec<_> = batch
            .records
            .iter()
            .map(|record| match record {
                RawRecord::ApiRow(fields) => fields.get("Timestamp").cloned(),
                RawRecord::SheetRow(_) => None,
            })
            .collect();
        assert_eq!(
            timestamps,
            vec![
                Some(json!("2024-01-01T00:00:00Z")),
                Some(json!("2024-01-02T00:00:00Z")),
                Some(json!("2024-01-03T00:00:00Z")),
            ]
        );
        assert_eq!(batch.mapping, FieldMapping::Fields(FieldNames::airtable()));
    }

    #[tokio::test]
    async fn stops_at_max_records() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    record("2024-01-03T00:00:00Z", 2.0),
                    record("2024-01-02T00:00:00Z", 1.0)
                ],
                "offset": "more"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let batch = source(server.uri(), 1).fetch_records().await.unwrap();
        assert_eq!(batch.len(), 1);
        let RawRecord::ApiRow(kept) = &batch.records[0] else {
            panic!("expected api row");
        };
        assert_eq!(kept.get("Timestamp"), Some(&json!("2024-01-03T00:00:00Z")));
    }

    #[tokio::test]
    async fn unauthorized_fails_fast() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let Err(err) = source(server.uri(), 10).fetch_records().await else {
            panic!("expected authentication failure");
        };
        assert!(matches!(err, DataSourceError::Authentication { .. }));
    }

    #[test]
    fn filter_formula_skips_blank_timestamps() {
        let source = source("http://localhost".to_string(), 10);
        let query = source.page_query(None);
        assert!(query.contains(&("filterByFormula", "NOT({Timestamp} = \"\")".to_string())));
        assert!(!query.iter().any(|(key, _)| *key == "offset"));
    }
}
