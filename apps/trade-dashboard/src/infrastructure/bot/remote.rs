//! Remote bot control over the bot's REST API.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::application::ports::{BotControlError, BotControlPort, BotStatus};
use crate::config::{BotConfig, RetryConfig};
use crate::domain::trade::parse::optional_decimal_from_json;
use crate::infrastructure::http_client::RetryingHttpClient;

const STATUS_PATH: &str = "/bot/status";
const TOGGLE_ON_PATH: &str = "/bot/toggle/on";
const TOGGLE_OFF_PATH: &str = "/bot/toggle/off";

/// Bot reachable at a configured base URL.
#[derive(Debug, Clone)]
pub struct RemoteBotControl {
    client: RetryingHttpClient,
    base_url: String,
}

impl RemoteBotControl {
    /// Create a controller for the bot at `base_url`.
    #[must_use]
    pub fn new(client: RetryingHttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Build from config; toggles are not retried.
    pub fn from_config(config: &BotConfig, base_url: &str) -> Result<Self, BotControlError> {
        let retry = RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        };
        let client = RetryingHttpClient::new(config.timeout(), retry, "bot_control")?;
        Ok(Self::new(client, base_url))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn toggle(&self, enable: bool) -> Result<BotStatus, BotControlError> {
        let (path, requested) = if enable {
            (TOGGLE_ON_PATH, "on")
        } else {
            (TOGGLE_OFF_PATH, "off")
        };

        let body: Value = self.client.post_json(&self.url(path), &HeaderMap::new()).await?;
        let status = match parse_status(&body) {
            Some(status) => status,
            None => self.status().await?,
        };

        if status.enabled != enable {
            tracing::warn!(requested, enabled = status.enabled, "Bot did not switch state");
            return Err(BotControlError::ToggleRejected { requested });
        }

        tracing::info!(enabled = status.enabled, "Bot switched");
        Ok(status)
    }
}

/// Read `{enabled, leverage}`, falling back to a `status`/`state` word.
fn parse_status(body: &Value) -> Option<BotStatus> {
    let map = body.as_object()?;
    let leverage = optional_decimal_from_json(map.get("leverage"));

    let enabled = match map.get("enabled") {
        Some(Value::Bool(enabled)) => *enabled,
        _ => {
            let word = map
                .get("status")
                .or_else(|| map.get("state"))
                .and_then(Value::as_str)?;
            match word.trim().to_ascii_lowercase().as_str() {
                "active" | "running" | "on" | "enabled" | "started" => true,
                "inactive" | "stopped" | "off" | "disabled" | "paused" => false,
                _ => return None,
            }
        }
    };

    Some(BotStatus { enabled, leverage })
}

#[async_trait]
impl BotControlPort for RemoteBotControl {
    async fn status(&self) -> Result<BotStatus, BotControlError> {
        let body: Value = self
            .client
            .get_json(&self.url(STATUS_PATH), &HeaderMap::new(), &[])
            .await?;
        parse_status(&body).ok_or_else(|| BotControlError::InvalidResponse {
            message: format!("unrecognised status body: {body}"),
        })
    }

    async fn turn_on(&self) -> Result<BotStatus, BotControlError> {
        self.toggle(true).await
    }

    async fn turn_off(&self) -> Result<BotStatus, BotControlError> {
        self.toggle(false).await
    }
}
