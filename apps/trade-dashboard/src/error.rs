//! API error handling for the dashboard service.
//!
//! Every failure surfaced over HTTP carries a stable [`ErrorCode`] and a
//! human-readable message, serialized as `{code, message}`.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `SNAPSHOT_UNAVAILABLE` | 503 | No successful refresh yet |
//! | `SOURCE_UNAVAILABLE` | 502 | Data source unreachable or failing |
//! | `SOURCE_AUTHENTICATION` | 502 | Data source rejected credentials |
//! | `SOURCE_RATE_LIMITED` | 502 | Data source throttled the refresh |
//! | `INVALID_SOURCE_RESPONSE` | 502 | Data source answered garbage |
//! | `REFRESH_TIMED_OUT` | 502 | Data source did not answer in time |
//! | `BOT_NOT_CONFIGURED` | 503 | No bot URL configured |
//! | `BOT_UNAVAILABLE` | 502 | Bot unreachable or answered garbage |
//! | `BOT_TOGGLE_REJECTED` | 409 | Bot stayed in the old state |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{BotControlError, DataSourceError};
use crate::application::use_cases::RefreshError;
use crate::domain::export::ExportError;

/// Error codes for the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No snapshot has been published yet.
    SnapshotUnavailable,
    /// Data source unreachable, failing, or out of retries.
    SourceUnavailable,
    /// Data source rejected the credentials.
    SourceAuthentication,
    /// Data source rate limited the request.
    SourceRateLimited,
    /// Data source response could not be read.
    InvalidSourceResponse,
    /// Data source fetch exceeded its timeout.
    RefreshTimedOut,
    /// Bot control is not configured.
    BotNotConfigured,
    /// Bot could not be reached or answered garbage.
    BotUnavailable,
    /// Bot did not reach the requested state.
    BotToggleRejected,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::SnapshotUnavailable | Self::BotNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::SourceUnavailable
            | Self::SourceAuthentication
            | Self::SourceRateLimited
            | Self::InvalidSourceResponse
            | Self::RefreshTimedOut
            | Self::BotUnavailable => StatusCode::BAD_GATEWAY,
            Self::BotToggleRejected => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::SnapshotUnavailable => "SNAPSHOT_UNAVAILABLE",
            Self::SourceUnavailable => "SOURCE_UNAVAILABLE",
            Self::SourceAuthentication => "SOURCE_AUTHENTICATION",
            Self::SourceRateLimited => "SOURCE_RATE_LIMITED",
            Self::InvalidSourceResponse => "INVALID_SOURCE_RESPONSE",
            Self::RefreshTimedOut => "REFRESH_TIMED_OUT",
            Self::BotNotConfigured => "BOT_NOT_CONFIGURED",
            Self::BotUnavailable => "BOT_UNAVAILABLE",
            Self::BotToggleRejected => "BOT_TOGGLE_REJECTED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

impl ApiError {
    /// Create a new API error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// No snapshot yet.
    #[must_use]
    pub fn snapshot_unavailable() -> Self {
        Self::new(
            ErrorCode::SnapshotUnavailable,
            "no trade data has been loaded yet",
        )
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Response body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self.to_body())).into_response()
    }
}

impl From<DataSourceError> for ApiError {
    fn from(err: DataSourceError) -> Self {
        let code = match &err {
            DataSourceError::Unavailable { .. } | DataSourceError::MaxRetriesExceeded { .. } => {
                ErrorCode::SourceUnavailable
            }
            DataSourceError::Authentication { .. } => ErrorCode::SourceAuthentication,
            DataSourceError::RateLimited => ErrorCode::SourceRateLimited,
            DataSourceError::InvalidResponse { .. } => ErrorCode::InvalidSourceResponse,
        };
        Self::new(code, err.to_string())
    }
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Fetch(source) => source.into(),
            RefreshError::TimedOut { .. } => Self::new(ErrorCode::RefreshTimedOut, err.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl From<BotControlError> for ApiError {
    fn from(err: BotControlError) -> Self {
        let code = match &err {
            BotControlError::NotConfigured => ErrorCode::BotNotConfigured,
            BotControlError::Unavailable { .. } | BotControlError::InvalidResponse { .. } => {
                ErrorCode::BotUnavailable
            }
            BotControlError::ToggleRejected { .. } => ErrorCode::BotToggleRejected,
        };
        Self::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_status_mapping() {
        assert_eq!(
            ErrorCode::SnapshotUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::RefreshTimedOut.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::BotToggleRejected.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_code_serializes_as_reason() {
        let json = serde_json::to_string(&ErrorCode::SourceRateLimited).unwrap();
        assert_eq!(json, "\"SOURCE_RATE_LIMITED\"");
        assert_eq!(ErrorCode::SourceRateLimited.to_string(), "SOURCE_RATE_LIMITED");
    }

    #[test]
    fn export_errors_are_internal() {
        let encoding = String::from_utf8(vec![0xff]).unwrap_err();
        let err = ApiError::from(ExportError::from(encoding));
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(err.message().starts_with("csv output is not utf-8"));
    }

    #[test]
    fn refresh_errors_map_to_gateway_codes() {
        let timeout = ApiError::from(RefreshError::TimedOut { secs: 20 });
        assert_eq!(timeout.code(), ErrorCode::RefreshTimedOut);
        assert_eq!(timeout.message(), "data source did not answer within 20s");

        let auth = ApiError::from(RefreshError::Fetch(DataSourceError::Authentication {
            message: "HTTP 401".to_string(),
        }));
        assert_eq!(auth.code(), ErrorCode::SourceAuthentication);

        let retries = ApiError::from(DataSourceError::MaxRetriesExceeded {
            attempts: 3,
            last_error: "HTTP 503".to_string(),
        });
        assert_eq!(retries.code(), ErrorCode::SourceUnavailable);
    }

    #[test]
    fn bot_errors_map_to_codes() {
        assert_eq!(
            ApiError::from(BotControlError::NotConfigured).code(),
            ErrorCode::BotNotConfigured
        );
        assert_eq!(
            ApiError::from(BotControlError::ToggleRejected { requested: "on" }).code(),
            ErrorCode::BotToggleRejected
        );
    }

    #[test]
    fn body_uses_reason_string() {
        let body = ApiError::snapshot_unavailable().to_body();
        assert_eq!(body.code, "SNAPSHOT_UNAVAILABLE");
        assert_eq!(body.message, "no trade data has been loaded yet");
    }
}
