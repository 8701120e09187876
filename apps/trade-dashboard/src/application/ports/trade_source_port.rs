//! Trade Data Source Port (Driven Port)
//!
//! Interface every trade backend implements. The refresh pipeline only
//! sees the raw batch and its field mapping, never credentials or transport.

use async_trait::async_trait;

use crate::domain::trade::{FieldMapping, RawTradeBatch};

/// Data source error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DataSourceError {
    /// Network failure, timeout or server error.
    #[error("data source unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Credentials rejected.
    #[error("data source authentication failed: {message}")]
    Authentication {
        /// Error details.
        message: String,
    },

    /// Too many requests.
    #[error("data source rate limited")]
    RateLimited,

    /// Response body could not be understood.
    #[error("invalid response from data source: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },

    /// Retries exhausted.
    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// Attempts made.
        attempts: u32,
        /// Last error seen.
        last_error: String,
    },
}

impl DataSourceError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::RateLimited)
    }
}

/// Port for fetching raw trade records.
#[async_trait]
pub trait TradeDataSourcePort: Send + Sync {
    /// Short identifier used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// How this source's records map onto canonical trades.
    fn field_mapping(&self) -> FieldMapping;

    /// Fetch every available record.
    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(DataSourceError::RateLimited.is_retryable());
        assert!(
            DataSourceError::Unavailable {
                message: "timeout".to_string()
            }
            .is_retryable()
        );
        assert!(
            !DataSourceError::Authentication {
                message: "bad key".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn error_display() {
        let err = DataSourceError::MaxRetriesExceeded {
            attempts: 3,
            last_error: "HTTP 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "max retries exceeded after 3 attempts: HTTP 503"
        );
    }
}
