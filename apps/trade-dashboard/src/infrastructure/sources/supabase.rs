//! Supabase adapter over the PostgREST gateway.
//!
//! Queries the newest `limit` rows and hands them over oldest first.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use super::endpoint_url;
use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::config::SupabaseConfig;
use crate::domain::trade::{FieldMapping, RawRecord, RawTradeBatch};
use crate::infrastructure::http_client::RetryingHttpClient;

/// Reads the newest trade rows from a Supabase table.
#[derive(Debug, Clone)]
pub struct SupabaseSource {
    client: RetryingHttpClient,
    config: SupabaseConfig,
}

impl SupabaseSource {
    /// Create the adapter.
    #[must_use]
    pub const fn new(client: RetryingHttpClient, config: SupabaseConfig) -> Self {
        Self { client, config }
    }

    fn headers(&self) -> Result<HeaderMap, DataSourceError> {
        let invalid_key = |_| DataSourceError::Authentication {
            message: "api key contains invalid header characters".to_string(),
        };
        let key = self.config.api_key.trim();

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid_key)?,
        );
        Ok(headers)
    }

    fn query(&self) -> [(&'static str, String); 3] {
        [
            ("select", "*".to_string()),
            ("order", format!("{}.desc", self.config.fields.timestamp)),
            ("limit", self.config.limit.to_string()),
        ]
    }
}

#[async_trait]
impl TradeDataSourcePort for SupabaseSource {
    fn name(&self) -> &'static str {
        "supabase"
    }

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::Fields(self.config.fields.clone())
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        let url = endpoint_url(&self.config.url, &["rest", "v1", &self.config.table])?;
        let rows: Vec<Map<String, Value>> = self
            .client
            .get_json(&url, &self.headers()?, &self.query())
            .await?;

        tracing::debug!(rows = rows.len(), table = %self.config.table, "Fetched Supabase rows");
        Ok(RawTradeBatch::new(
            self.field_mapping(),
            rows.into_iter().rev().map(RawRecord::ApiRow).collect(),
        ))
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

    fn source(url: String) -> SupabaseSource {
        let client = RetryingHttpClient::new(
            Duration::from_secs(5),
            RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
            "supabase",
        )
        .unwrap();
        SupabaseSource::new(
            client,
            SupabaseConfig {
                url,
                api_key: "anon-key".to_string(),
                table: "trade_data".to_string(),
                limit: 50,
                fields: FieldNames::supabase(),
            },
        )
    }

    #[tokio::test]
    async fn queries_newest_rows_and_delivers_oldest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/trade_data"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(query_param("select", "*"))
            .and(query_param("order", "timestamp.desc"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"timestamp": "2024-02-01T00:00:00Z", "position_type": "long", "pnl_percent": 2.5},
                {"timestamp": "2024-01-31T00:00:00Z", "position_type": "short", "pnl_percent": null}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let batch = source(server.uri()).fetch_records().await.unwrap();

        assert_eq!(batch.len(), 2);
        let RawRecord::ApiRow(open) = &batch.records[0] else {
            panic!("expected api row");
        };
        assert_eq!(open.get("pnl_percent"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn non_array_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "nope"})))
            .mount(&server)
            .await;

        let Err(err) = source(server.uri()).fetch_records().await else {
            panic!("expected invalid response");
        };
        assert!(matches!(err, DataSourceError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn missing_table_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("relation does not exist"))
            .mount(&server)
            .await;

        let Err(DataSourceError::InvalidResponse { message }) =
            source(server.uri()).fetch_records().await
        else {
            panic!("expected invalid response");
        };
        assert!(message.contains("404"));
    }
}
