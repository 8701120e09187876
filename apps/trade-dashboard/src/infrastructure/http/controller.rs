//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API serving the published snapshot and delegating
//! refresh and bot control to the application layer.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::application::ports::{BotControlPort, TradeDataSourcePort};
use crate::application::services::{DashboardRefresher, SnapshotStore};
use crate::application::use_cases::DashboardSnapshot;
use crate::domain::export::trades_to_csv;
use crate::error::ApiError;

use super::response::{HealthResponse, MetricsResponse};

/// Application state shared across handlers.
pub struct AppState<S, B>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    /// Refresher for on-demand refreshes.
    pub refresher: DashboardRefresher<S>,
    /// Published snapshot.
    pub store: Arc<SnapshotStore>,
    /// Bot control.
    pub bot: Arc<B>,
    /// Application version.
    pub version: String,
}

impl<S, B> AppState<S, B>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    /// Build state around a refresher, reading from its store.
    pub fn new(refresher: DashboardRefresher<S>, bot: Arc<B>, version: impl Into<String>) -> Self {
        Self {
            store: Arc::clone(refresher.store()),
            refresher,
            bot,
            version: version.into(),
        }
    }

    fn snapshot(&self) -> Result<Arc<DashboardSnapshot>, ApiError> {
        self.store.current().ok_or_else(ApiError::snapshot_unavailable)
    }
}

impl<S, B> Clone for AppState<S, B>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    fn clone(&self) -> Self {
        Self {
            refresher: self.refresher.clone(),
            store: Arc::clone(&self.store),
            bot: Arc::clone(&self.bot),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<S, B>(state: AppState<S, B>) -> Router
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/dashboard", get(dashboard))
        .route("/api/v1/metrics", get(metrics))
        .route("/api/v1/trades", get(trades))
        .route("/api/v1/trades/export", get(export_trades))
        .route("/api/v1/series", get(series))
        .route("/api/v1/refresh", post(refresh))
        .route("/api/v1/bot/status", get(bot_status))
        .route("/api/v1/bot/on", post(bot_on))
        .route("/api/v1/bot/off", post(bot_off))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<S, B>(State(state): State<AppState<S, B>>) -> impl IntoResponse
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        has_snapshot: state.store.has_snapshot(),
        last_error: state.store.last_error(),
    })
}

/// Full snapshot.
async fn dashboard<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.snapshot()?;
    Ok(Json(snapshot.as_ref()).into_response())
}

/// Metrics with display strings.
async fn metrics<S, B>(
    State(state): State<AppState<S, B>>,
) -> Result<Json<MetricsResponse>, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.snapshot()?;
    Ok(Json(MetricsResponse::from(snapshot.metrics.clone())))
}

/// Canonical trades, oldest first.
async fn trades<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.snapshot()?;
    Ok(Json(&snapshot.trades).into_response())
}

/// Derived chart series.
async fn series<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.snapshot()?;
    Ok(Json(&snapshot.series).into_response())
}

/// CSV download of the trade list.
async fn export_trades<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.snapshot()?;
    let csv = trades_to_csv(&snapshot.trades)?;
    let disposition = format!(
        "attachment; filename=\"trades-{}.csv\"",
        snapshot.generated_at.date_string()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

/// Run one refresh and return the new metrics.
async fn refresh<S, B>(
    State(state): State<AppState<S, B>>,
) -> Result<Json<MetricsResponse>, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let snapshot = state.refresher.refresh_now().await?;
    Ok(Json(MetricsResponse::from(snapshot.metrics.clone())))
}

/// Bot status.
async fn bot_status<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let status = state.bot.status().await?;
    Ok(Json(status).into_response())
}

/// Enable the bot.
async fn bot_on<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let status = state.bot.turn_on().await?;
    Ok(Json(status).into_response())
}

/// Disable the bot.
async fn bot_off<S, B>(State(state): State<AppState<S, B>>) -> Result<Response, ApiError>
where
    S: TradeDataSourcePort + 'static,
    B: BotControlPort,
{
    let status = state.bot.turn_off().await?;
    Ok(Json(status).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{BotControlError, BotStatus, DataSourceError};
    use crate::application::services::DEFAULT_REFRESH_INTERVAL;
    use crate::application::use_cases::RefreshDashboardUseCase;
    use crate::domain::metrics::MetricsCalculator;
    use crate::domain::series::SeriesBuilder;
    use crate::domain::trade::{ColumnLayout, FieldMapping, RawRecord, RawTradeBatch, TradeNormalizer};
    use crate::infrastructure::bot::ConfiguredBot;
    use crate::infrastructure::sources::InMemoryTradeSource;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use parking_lot::Mutex;
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    struct StubBot {
        enabled: Mutex<bool>,
    }

    #[async_trait]
    impl BotControlPort for StubBot {
        async fn status(&self) -> Result<BotStatus, BotControlError> {
            Ok(BotStatus {
                enabled: *self.enabled.lock(),
                leverage: None,
            })
        }

        async fn turn_on(&self) -> Result<BotStatus, BotControlError> {
            *self.enabled.lock() = true;
            self.status().await
        }

        async fn turn_off(&self) -> Result<BotStatus, BotControlError> {
            Err(BotControlError::ToggleRejected { requested: "off" })
        }
    }

    fn row(ts: &str, pnl: &str, account: &str) -> RawRecord {
        RawRecord::SheetRow(vec![
            ts.to_string(),
            "100".to_string(),
            "Long".to_string(),
            "101".to_string(),
            pnl.to_string(),
            account.to_string(),
        ])
    }

    fn source() -> Arc<InMemoryTradeSource> {
        Arc::new(InMemoryTradeSource::new(RawTradeBatch::new(
            FieldMapping::Columns(ColumnLayout::default()),
            vec![
                row("2024-01-02 10:00:00", "-1", "15.0"),
                row("2024-01-01 10:00:00", "2", "15.2"),
                row("2024-01-03 10:00:00", "3", "15.5"),
            ],
        )))
    }

    fn state_with<B: BotControlPort>(
        source: Arc<InMemoryTradeSource>,
        bot: B,
    ) -> AppState<InMemoryTradeSource, B> {
        let use_case = RefreshDashboardUseCase::new(
            source,
            TradeNormalizer::default(),
            MetricsCalculator::default(),
            SeriesBuilder::default(),
        );
        let refresher = DashboardRefresher::new(
            Arc::new(use_case),
            Arc::new(SnapshotStore::new()),
            DEFAULT_REFRESH_INTERVAL,
            CancellationToken::new(),
        );
        AppState::new(refresher, Arc::new(bot), "1.0.0-test")
    }

    fn stub_bot() -> StubBot {
        StubBot {
            enabled: Mutex::new(false),
        }
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn health_check_reports_missing_snapshot() {
        let app = create_router(state_with(source(), stub_bot()));

        let (status, body) = send(app, "GET", "/health").await;

        assert_eq!(status, StatusCode::OK);
        let body = json(&body);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["hasSnapshot"], false);
    }

    #[tokio::test]
    async fn dashboard_unavailable_before_first_refresh() {
        let app = create_router(state_with(source(), stub_bot()));

        let (status, body) = send(app, "GET", "/api/v1/dashboard").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(&body)["code"], "SNAPSHOT_UNAVAILABLE");
    }

    #[tokio::test]
    async fn refresh_then_read_snapshot() {
        let state = state_with(source(), stub_bot());
        let app = create_router(state.clone());

        let (status, body) = send(app.clone(), "POST", "/api/v1/refresh").await;
        assert_eq!(status, StatusCode::OK);
        let metrics = json(&body);
        assert_eq!(metrics["totalTrades"], 3);
        assert_eq!(metrics["display"]["winRate"], "66.67%");

        let (status, body) = send(app.clone(), "GET", "/api/v1/trades").await;
        assert_eq!(status, StatusCode::OK);
        let trades = json(&body);
        let Some(trades) = trades.as_array() else {
            panic!("trades should be an array");
        };
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0]["pnlPercentage"], "2");

        let (status, body) = send(app.clone(), "GET", "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        let dashboard = json(&body);
        assert_eq!(dashboard["source"], "in_memory");
        assert!(dashboard["series"]["equityCurve"].is_array());

        let (status, _) = send(app, "GET", "/api/v1/series").await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.store.has_snapshot());
    }

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let state = state_with(source(), stub_bot());
        state.refresher.refresh_now().await.unwrap();
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/trades/export")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"trades-"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("Date,Symbol,Position"));
    }

    #[tokio::test]
    async fn failed_refresh_is_bad_gateway() {
        let source = source();
        source.fail_with(DataSourceError::Unavailable {
            message: "connection refused".to_string(),
        });
        let app = create_router(state_with(source, stub_bot()));

        let (status, body) = send(app.clone(), "POST", "/api/v1/refresh").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json(&body)["code"], "SOURCE_UNAVAILABLE");

        let (_, body) = send(app, "GET", "/health").await;
        assert!(json(&body)["lastError"]["message"].is_string());
    }

    #[tokio::test]
    async fn bot_routes_delegate_to_port() {
        let app = create_router(state_with(source(), stub_bot()));

        let (status, body) = send(app.clone(), "POST", "/api/v1/bot/on").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["enabled"], true);

        let (status, body) = send(app.clone(), "GET", "/api/v1/bot/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["enabled"], true);

        let (status, body) = send(app, "POST", "/api/v1/bot/off").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json(&body)["code"], "BOT_TOGGLE_REJECTED");
    }

    #[tokio::test]
    async fn bot_routes_unavailable_without_url() {
        let app = create_router(state_with(source(), ConfiguredBot::Disabled));

        let (status, body) = send(app, "GET", "/api/v1/bot/status").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json(&body)["code"], "BOT_NOT_CONFIGURED");
    }
}
