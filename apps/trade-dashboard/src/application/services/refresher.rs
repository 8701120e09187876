//! Dashboard Refresher Service
//!
//! Runs the refresh use case on an interval and on demand. Refreshes are
//! strictly sequential: a request made while one is in flight waits for it
//! to finish, then runs against fresh data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::snapshot_store::SnapshotStore;
use crate::application::ports::TradeDataSourcePort;
use crate::application::use_cases::{DashboardSnapshot, RefreshDashboardUseCase, RefreshError};
use crate::observability;

/// Default polling interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic and on-demand snapshot refresher.
pub struct DashboardRefresher<S>
where
    S: TradeDataSourcePort + 'static,
{
    use_case: Arc<RefreshDashboardUseCase<S>>,
    store: Arc<SnapshotStore>,
    gate: Arc<Mutex<()>>,
    interval: Duration,
    shutdown: CancellationToken,
}

// Manual Clone: S itself need not be Clone.
impl<S> Clone for DashboardRefresher<S>
where
    S: TradeDataSourcePort + 'static,
{
    fn clone(&self) -> Self {
        Self {
            use_case: Arc::clone(&self.use_case),
            store: Arc::clone(&self.store),
            gate: Arc::clone(&self.gate),
            interval: self.interval,
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<S> DashboardRefresher<S>
where
    S: TradeDataSourcePort + 'static,
{
    /// Create a new refresher.
    #[must_use]
    pub fn new(
        use_case: Arc<RefreshDashboardUseCase<S>>,
        store: Arc<SnapshotStore>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            use_case,
            store,
            gate: Arc::new(Mutex::new(())),
            interval,
            shutdown,
        }
    }

    /// Store the refresher publishes into.
    #[must_use]
    pub const fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Polling interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one refresh now, after any refresh already in flight.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous snapshot stays published.
    pub async fn refresh_now(&self) -> Result<Arc<DashboardSnapshot>, RefreshError> {
        let _guard = self.gate.lock().await;
        let started = Instant::now();

        match self.use_case.execute().await {
            Ok(snapshot) => {
                let trades = snapshot.trades.len();
                let rejected = snapshot.rejected_records.len();
                let published = self.store.publish(snapshot);

                observability::record_refresh("success", started.elapsed().as_secs_f64());
                observability::record_rejected_records(rejected);
                observability::update_trade_count(trades);

                tracing::info!(
                    source = self.use_case.source_name(),
                    trades,
                    rejected,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Dashboard snapshot refreshed"
                );
                Ok(published)
            }
            Err(err) => {
                observability::record_refresh(err.outcome(), started.elapsed().as_secs_f64());
                self.store.record_failure(&err);

                tracing::warn!(
                    source = self.use_case.source_name(),
                    error = %err,
                    "Dashboard refresh failed, keeping previous snapshot"
                );
                Err(err)
            }
        }
    }

    /// Spawn the interval loop. The first refresh runs immediately; the loop
    /// ends when the shutdown token is cancelled.
    pub fn start(&self) -> JoinHandle<()> {
        let refresher = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresher.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_secs = refresher.interval.as_secs(),
                source = refresher.use_case.source_name(),
                "Starting dashboard refresher"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // Failures are logged and recorded in the store.
                        let _ = refresher.refresh_now().await;
                    }
                    () = refresher.shutdown.cancelled() => {
                        tracing::info!("Dashboard refresher shutting down");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::DataSourceError;
    use crate::domain::metrics::MetricsCalculator;
    use crate::domain::series::SeriesBuilder;
    use crate::domain::trade::{ColumnLayout, FieldMapping, RawRecord, RawTradeBatch, TradeNormalizer};
    use crate::infrastructure::sources::InMemoryTradeSource;

    fn batch(rows: usize) -> RawTradeBatch {
        RawTradeBatch::new(
            FieldMapping::Columns(ColumnLayout::default()),
            (0..rows)
                .map(|i| {
                    RawRecord::SheetRow(vec![
                        format!("2024-01-{:02}", i + 1),
                        "100".to_string(),
                        "Long".to_string(),
                        "101".to_string(),
                        "1".to_string(),
                        "15".to_string(),
                    ])
                })
                .collect(),
        )
    }

    fn refresher(
        source: Arc<InMemoryTradeSource>,
        interval: Duration,
    ) -> DashboardRefresher<InMemoryTradeSource> {
        let use_case = RefreshDashboardUseCase::new(
            source,
            TradeNormalizer::default(),
            MetricsCalculator::default(),
            SeriesBuilder::default(),
        );
        DashboardRefresher::new(
            Arc::new(use_case),
            Arc::new(SnapshotStore::new()),
            interval,
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn concurrent_refreshes_are_serialized() {
        let source = Arc::new(InMemoryTradeSource::new(batch(3)).with_delay(Duration::from_millis(20)));
        let refresher = refresher(Arc::clone(&source), DEFAULT_REFRESH_INTERVAL);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let r = refresher.clone();
                tokio::spawn(async move { r.refresh_now().await })
            })
            .collect();
        for handle in handles {
            tokio_test::assert_ok!(handle.await.unwrap());
        }

        assert_eq!(source.fetch_count(), 5);
        assert_eq!(source.peak_in_flight(), 1);
        assert_eq!(refresher.store().successful_refreshes(), 5);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_snapshot() {
        let source = Arc::new(InMemoryTradeSource::new(batch(2)));
        let refresher = refresher(Arc::clone(&source), DEFAULT_REFRESH_INTERVAL);
        tokio_test::assert_ok!(refresher.refresh_now().await);

        source.fail_with(DataSourceError::Unavailable {
            message: "connection refused".to_string(),
        });
        tokio_test::assert_err!(refresher.refresh_now().await);

        let Some(snapshot) = refresher.store().current() else {
            panic!("previous snapshot should remain");
        };
        assert_eq!(snapshot.trades.len(), 2);
        assert!(refresher.store().last_error().is_some());
    }

    #[tokio::test]
    async fn interval_loop_refreshes_until_cancelled() {
        let source = Arc::new(InMemoryTradeSource::new(batch(1)));
        let refresher = refresher(Arc::clone(&source), Duration::from_millis(10));

        let handle = refresher.start();
        tokio::time::sleep(Duration::from_millis(60)).await;
        refresher.shutdown.cancel();
        tokio_test::assert_ok!(handle.await);

        assert!(refresher.store().has_snapshot());
        assert!(source.fetch_count() >= 2);
    }
}
