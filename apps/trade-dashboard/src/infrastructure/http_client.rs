//! HTTP client wrapper with retry logic.
//!
//! Shared by every REST data source and by remote bot control. Transient
//! failures (network errors, 408, 429, 5xx) are retried with exponential
//! backoff; authentication failures return immediately.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::application::ports::{BotControlError, DataSourceError};
use crate::config::{HttpClientConfig, RetryConfig};
use crate::observability::record_source_retry;

/// Transport-level failure.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// Request could not be sent or the body could not be read.
    #[error("network error: {0}")]
    Network(String),

    /// Credentials rejected (401 or 403).
    #[error("authentication failed (HTTP {status})")]
    Authentication {
        /// Response status.
        status: u16,
    },

    /// Rate limit hit and no retries left.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Server hint, or 60 when absent.
        retry_after_secs: u64,
    },

    /// Non-retryable error status.
    #[error("HTTP {status}: {message}")]
    Api {
        /// Response status.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// Body was not the expected JSON.
    #[error("failed to parse response: {0}")]
    JsonParse(String),

    /// Retries exhausted.
    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Attempts made.
        attempts: u32,
        /// Last failure seen.
        last_error: String,
    },
}

/// HTTP client with retry logic.
#[derive(Debug, Clone)]
pub struct RetryingHttpClient {
    client: Client,
    retry_config: RetryConfig,
    label: &'static str,
}

impl RetryingHttpClient {
    /// Create a client with the given per-request timeout.
    ///
    /// `label` names the caller in logs and the retry counter.
    pub fn new(
        timeout: Duration,
        retry_config: RetryConfig,
        label: &'static str,
    ) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::Network(e.to_string()))?;

        Ok(Self {
            client,
            retry_config,
            label,
        })
    }

    /// Create a client from the shared outbound HTTP settings.
    pub fn from_config(
        config: &HttpClientConfig,
        label: &'static str,
    ) -> Result<Self, HttpClientError> {
        Self::new(config.timeout(), config.retry.clone(), label)
    }

    /// Caller label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
        query: &[(&str, String)],
    ) -> Result<T, HttpClientError> {
        self.request(Method::GET, url, headers, query).await
    }

    /// POST to `url` without a body and decode the JSON response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<T, HttpClientError> {
        self.request(Method::POST, url, headers, &[]).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        headers: &HeaderMap,
        query: &[(&str, String)],
    ) -> Result<T, HttpClientError> {
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let request = self
                .client
                .request(method.clone(), url)
                .headers(headers.clone())
                .query(query);

            let response = match request.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            client = self.label,
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Network error, retrying"
                        );
                        record_source_retry(self.label);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(HttpClientError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                        last_error: e.to_string(),
                    });
                }
            };

            let status = response.status();

            if status.is_success() {
                let text = response
                    .text()
                    .await
                    .map_err(|e| HttpClientError::Network(e.to_string()))?;
                let body = if text.trim().is_empty() { "null" } else { text.as_str() };
                return serde_json::from_str(body)
                    .map_err(|e| HttpClientError::JsonParse(e.to_string()));
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());

            let error_body = response.text().await.unwrap_or_default();

            match categorize_status(status) {
                ErrorCategory::RateLimited => {
                    let delay = backoff
                        .next_backoff()
                        .map(|d| retry_after.map_or(d, Duration::from_secs));
                    if let Some(delay) = delay {
                        tracing::warn!(
                            client = self.label,
                            delay_ms = delay.as_millis(),
                            "Rate limited, retrying"
                        );
                        record_source_retry(self.label);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(HttpClientError::RateLimited {
                        retry_after_secs: retry_after.unwrap_or(60),
                    });
                }
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            client = self.label,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            "Retryable error, retrying"
                        );
                        record_source_retry(self.label);
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(HttpClientError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                        last_error: format!("HTTP {}", status.as_u16()),
                    });
                }
                ErrorCategory::NonRetryable => {
                    return match status {
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                            Err(HttpClientError::Authentication {
                                status: status.as_u16(),
                            })
                        }
                        _ => Err(HttpClientError::Api {
                            status: status.as_u16(),
                            message: error_body,
                        }),
                    };
                }
            }
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    RateLimited,
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        429 => ErrorCategory::RateLimited,
        408 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff(),
            max_backoff: config.max_backoff(),
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}

impl From<HttpClientError> for DataSourceError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::Network(message) => Self::Unavailable { message },
            HttpClientError::Authentication { status } => Self::Authentication {
                message: format!("HTTP {status}"),
            },
            HttpClientError::RateLimited { .. } => Self::RateLimited,
            HttpClientError::Api { status, message } => Self::InvalidResponse {
                message: format!("HTTP {status}: {message}"),
            },
            HttpClientError::JsonParse(message) => Self::InvalidResponse { message },
            HttpClientError::MaxRetriesExceeded {
                attempts,
                last_error,
            } => Self::MaxRetriesExceeded {
                attempts,
                last_error,
            },
        }
    }
}

impl From<HttpClientError> for BotControlError {
    fn from(err: HttpClientError) -> Self {
        match err {
            HttpClientError::JsonParse(message) => Self::InvalidResponse { message },
            other => Self::Unavailable {
                message: other.to_string(),
            },
        }
    }
}
