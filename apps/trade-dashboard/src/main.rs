//! Trade Dashboard Binary
//!
//! Starts the dashboard metrics service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trade-dashboard
//! ```
//!
//! # Environment Variables
//!
//! - `DASHBOARD_CONFIG`: path to the YAML config (default: `config.yaml`)
//! - `RUST_LOG`: log filter (default: `observability.logging.level`)
//! - `OTEL_ENABLED`: set to `false` to disable trace export
//!
//! Credentials referenced from the config as `${VAR}` are read from the
//! environment or a `.env` file in the working directory or an ancestor.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use trade_dashboard::config::{Config, load_config};
use trade_dashboard::infrastructure::container::Container;
use trade_dashboard::observability::{MetricsConfig, init_metrics};
use trade_dashboard::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    let config = load_config(None)?;
    let _telemetry = init_telemetry(&config.observability.logging);

    tracing::info!("Starting Trade Dashboard");
    log_config(&config);

    if config.observability.prometheus.enabled {
        let addr: SocketAddr = config.observability.prometheus.listen_address.parse()?;
        init_metrics(&MetricsConfig::with_addr(addr))?;
    }

    let shutdown = CancellationToken::new();
    let container = Container::from_config(&config, shutdown.clone())?;

    // The loop refreshes once immediately, then every interval.
    let refresh_handle = container.refresher().start();

    let http_handle = start_http_server(&config, &container, shutdown.clone()).await?;

    tracing::info!("Trade dashboard ready");

    await_shutdown(
        http_handle,
        refresh_handle,
        shutdown,
        config.server.shutdown_timeout(),
    )
    .await;

    tracing::info!("Trade dashboard stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &Config) {
    tracing::info!(
        source = config.source.kind(),
        http_port = config.server.http_port,
        refresh_interval_secs = config.refresh.interval_secs,
        fetch_timeout_secs = config.refresh.fetch_timeout_secs,
        bot_control = config.bot.base_url().is_some(),
        prometheus = config.observability.prometheus.enabled,
        "Configuration loaded"
    );
}

/// Start the HTTP server with graceful shutdown support.
async fn start_http_server(
    config: &Config,
    container: &Container,
    shutdown: CancellationToken,
) -> Result<JoinHandle<()>, Box<dyn std::error::Error>> {
    let app = container.router();

    let http_addr = config.server.socket_addr()?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/dashboard");
    tracing::info!("  GET  /api/v1/metrics");
    tracing::info!("  GET  /api/v1/trades");
    tracing::info!("  GET  /api/v1/trades/export");
    tracing::info!("  GET  /api/v1/series");
    tracing::info!("  POST /api/v1/refresh");
    tracing::info!("  GET  /api/v1/bot/status");
    tracing::info!("  POST /api/v1/bot/on");
    tracing::info!("  POST /api/v1/bot/off");

    let listener = TcpListener::bind(http_addr).await?;
    let http_server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(shutdown));

    let handle = tokio::spawn(async move {
        if let Err(e) = http_server.await {
            tracing::error!("HTTP server error: {e}");
        }
    });

    Ok(handle)
}

/// Wait for the HTTP server to stop, then stop the refresh loop.
async fn await_shutdown(
    http_handle: JoinHandle<()>,
    refresh_handle: JoinHandle<()>,
    shutdown: CancellationToken,
    timeout: Duration,
) {
    if let Err(e) = http_handle.await {
        tracing::error!(error = %e, "HTTP server task failed");
    }

    shutdown.cancel();

    match tokio::time::timeout(timeout, refresh_handle).await {
        Ok(_) => tracing::info!("Refresh loop stopped"),
        Err(_) => tracing::warn!(
            timeout_secs = timeout.as_secs(),
            "Refresh loop did not stop in time"
        ),
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT) or cancellation.
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
        () = shutdown.cancelled() => {}
    }

    shutdown.cancel();

    tracing::info!("Graceful shutdown started");
}
