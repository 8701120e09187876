//! Dependency Injection Container
//!
//! Wires the configured adapters, domain services and refresher together.

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{BotControlError, DataSourceError};
use crate::application::services::{DashboardRefresher, SnapshotStore};
use crate::application::use_cases::RefreshDashboardUseCase;
use crate::config::{Config, config_decimal};
use crate::domain::metrics::MetricsCalculator;
use crate::domain::series::SeriesBuilder;
use crate::domain::shared::Symbol;
use crate::domain::trade::{NormalizerOptions, TradeNormalizer};

use super::bot::ConfiguredBot;
use super::http::{AppState, create_router};
use super::sources::ConfiguredSource;

/// Wiring failure at start-up.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The data source could not be built.
    #[error("data source setup failed: {0}")]
    Source(#[from] DataSourceError),
    /// Bot control could not be built.
    #[error("bot control setup failed: {0}")]
    Bot(#[from] BotControlError),
}

/// Dependency injection container.
pub struct Container {
    refresher: DashboardRefresher<ConfiguredSource>,
    bot: Arc<ConfiguredBot>,
}

impl Container {
    /// Build every component named by `config`.
    pub fn from_config(config: &Config, shutdown: CancellationToken) -> Result<Self, ContainerError> {
        let source = Arc::new(ConfiguredSource::from_config(config)?);
        let bot = Arc::new(ConfiguredBot::from_config(&config.bot)?);

        let use_case = RefreshDashboardUseCase::new(
            source,
            normalizer(config),
            MetricsCalculator::new(config_decimal(config.metrics.default_stop_loss)),
            SeriesBuilder::new(config_decimal(config.metrics.histogram_bucket_width)),
        )
        .with_fetch_timeout(config.refresh.fetch_timeout());

        let refresher = DashboardRefresher::new(
            Arc::new(use_case),
            Arc::new(SnapshotStore::new()),
            config.refresh.interval(),
            shutdown,
        );

        Ok(Self { refresher, bot })
    }

    /// The refresher.
    pub const fn refresher(&self) -> &DashboardRefresher<ConfiguredSource> {
        &self.refresher
    }

    /// The snapshot store.
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(self.refresher.store())
    }

    /// HTTP router over the wired components.
    pub fn router(&self) -> Router {
        create_router(AppState::new(
            self.refresher.clone(),
            Arc::clone(&self.bot),
            env!("CARGO_PKG_VERSION"),
        ))
    }
}

fn normalizer(config: &Config) -> TradeNormalizer {
    TradeNormalizer::new(NormalizerOptions {
        default_symbol: Symbol::new(config.normalization.default_symbol.as_str()),
        initial_account_value: config_decimal(config.normalization.initial_account_value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_string;
    use rust_decimal_macros::dec;

    #[test]
    fn normalizer_uses_configured_defaults() {
        let config = load_config_from_string(
            "normalization:\n  default_symbol: btc\n  initial_account_value: 100\n",
        )
        .unwrap();

        let normalizer = normalizer(&config);
        assert_eq!(normalizer.options().default_symbol.as_str(), "BTC");
        assert_eq!(normalizer.options().initial_account_value, dec!(100));
    }

    #[tokio::test]
    async fn builds_from_default_config() {
        let container = Container::from_config(&Config::default(), CancellationToken::new()).unwrap();

        assert_eq!(
            container.refresher().interval(),
            std::time::Duration::from_secs(30)
        );
        container.refresher().refresh_now().await.unwrap();
        assert!(container.store().has_snapshot());
    }

    #[test]
    fn missing_fixture_fails_setup() {
        let config = load_config_from_string(
            "source:\n  kind: in_memory\n  fixture_path: /nonexistent/fixture.json\n",
        )
        .unwrap();

        let Err(err) = Container::from_config(&config, CancellationToken::new()) else {
            panic!("expected setup failure");
        };
        assert!(matches!(err, ContainerError::Source(_)));
    }
}
