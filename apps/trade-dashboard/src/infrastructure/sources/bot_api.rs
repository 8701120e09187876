//! Trades served by the bot's own REST API.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::config::BotApiSourceConfig;
use crate::domain::trade::{FieldMapping, RawRecord, RawTradeBatch};
use crate::infrastructure::http_client::RetryingHttpClient;

/// Reads closed trades from `GET {base_url}{path}`.
///
/// Accepts either a bare array of trade objects or an object wrapping the
/// array under `trades` or `data`.
#[derive(Debug, Clone)]
pub struct BotApiSource {
    client: RetryingHttpClient,
    config: BotApiSourceConfig,
}

impl BotApiSource {
    /// Create the adapter.
    #[must_use]
    pub const fn new(client: RetryingHttpClient, config: BotApiSourceConfig) -> Self {
        Self { client, config }
    }

    fn trades_url(&self) -> String {
        let base = self.config.base_url.trim().trim_end_matches('/');
        let path = self.config.path.trim();
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn extract_records(body: Value) -> Result<Vec<RawRecord>, DataSourceError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("trades").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DataSourceError::InvalidResponse {
                    message: "expected a trades array".to_string(),
                });
            }
        },
        _ => {
            return Err(DataSourceError::InvalidResponse {
                message: "expected a trades array".to_string(),
            });
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(RawRecord::ApiRow(map)),
            _ => None,
        })
        .collect())
}

#[async_trait]
impl TradeDataSourcePort for BotApiSource {
    fn name(&self) -> &'static str {
        "bot_api"
    }

    fn field_mapping(&self) -> FieldMapping {
        FieldMapping::Fields(self.config.fields.clone())
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        let body: Value = self
            .client
            .get_json(&self.trades_url(), &HeaderMap::new(), &[])
            .await?;
        let records = extract_records(body)?;

        tracing::debug!(records = records.len(), "Fetched bot API trades");
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
    use test_case::test_case;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(base_url: String, trades_path: &str) -> BotApiSource {
        let client = RetryingHttpClient::new(
            Duration::from_secs(5),
            RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            },
            "bot_api",
        )
        .unwrap();
        BotApiSource::new(
            client,
            BotApiSourceConfig {
                base_url,
                path: trades_path.to_string(),
                fields: FieldNames::bot_api(),
            },
        )
    }

    #[test_case("http://bot:5000", "/trades", "http://bot:5000/trades" ; "plain")]
    #[test_case("http://bot:5000/", "/trades", "http://bot:5000/trades" ; "trailing slash")]
    #[test_case("http://bot:5000", "api/trades", "http://bot:5000/api/trades" ; "relative path")]
    fn builds_trades_url(base: &str, trades_path: &str, expected: &str) {
        assert_eq!(source(base.to_string(), trades_path).trades_url(), expected);
    }

    #[test]
    fn accepts_wrapped_arrays() {
        let wrapped = json!({"trades": [{"timestamp": "2024-01-01"}, 42]});
        assert_eq!(extract_records(wrapped).unwrap().len(), 1);

        let data = json!({"data": [{"timestamp": "2024-01-01"}]});
        assert_eq!(extract_records(data).unwrap().len(), 1);

        assert!(extract_records(json!({"status": "ok"})).is_err());
        assert!(extract_records(json!("trades")).is_err());
    }

    #[tokio::test]
    async fn fetches_trade_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trades"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"timestamp": "2024-01-15T10:00:00Z", "symbol": "sol", "pnlPercentage": 1.5},
                {"timestamp": "2024-01-16T10:00:00Z", "symbol": "sol", "pnlPercentage": -0.5}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let batch = source(server.uri(), "/trades").fetch_records().await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.mapping, FieldMapping::Fields(FieldNames::bot_api()));
    }
}
