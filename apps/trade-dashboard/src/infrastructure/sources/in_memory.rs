//! In-memory trade source for tests and demos.

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::application::ports::{DataSourceError, TradeDataSourcePort};
use crate::domain::trade::{FieldMapping, FieldNames, RawRecord, RawTradeBatch};

/// Source serving a fixed batch.
///
/// The batch and a forced failure can be swapped at runtime; fetches are
/// counted so tests can observe scheduling.
#[derive(Debug)]
pub struct InMemoryTradeSource {
    batch: RwLock<RawTradeBatch>,
    failure: RwLock<Option<DataSourceError>>,
    delay: Option<Duration>,
    fetches: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl InMemoryTradeSource {
    /// Serve `batch` on every fetch.
    #[must_use]
    pub fn new(batch: RawTradeBatch) -> Self {
        Self {
            batch: RwLock::new(batch),
            failure: RwLock::new(None),
            delay: None,
            fetches: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// A source with no records.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(RawTradeBatch::new(
            FieldMapping::Fields(FieldNames::bot_api()),
            Vec::new(),
        ))
    }

    /// Load a JSON array of trade objects using the bot API field names.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| DataSourceError::Unavailable {
            message: format!("cannot read fixture {}: {e}", path.display()),
        })?;
        Self::from_json(&contents)
    }

    /// Parse a JSON array of trade objects using the bot API field names.
    pub fn from_json(json: &str) -> Result<Self, DataSourceError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DataSourceError::InvalidResponse {
                message: e.to_string(),
            })?;
        let Value::Array(items) = value else {
            return Err(DataSourceError::InvalidResponse {
                message: "fixture must be a JSON array".to_string(),
            });
        };

        let records = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(RawRecord::ApiRow(map)),
                _ => None,
            })
            .collect();

        Ok(Self::new(RawTradeBatch::new(
            FieldMapping::Fields(FieldNames::bot_api()),
            records,
        )))
    }

    /// Sleep this long inside every fetch.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the served batch.
    pub fn set_batch(&self, batch: RawTradeBatch) {
        *self.batch.write() = batch;
    }

    /// Make every following fetch fail with `error`.
    pub fn fail_with(&self, error: DataSourceError) {
        *self.failure.write() = Some(error);
    }

    /// Stop failing.
    pub fn recover(&self) {
        *self.failure.write() = None;
    }

    /// Fetches started so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeDataSourcePort for InMemoryTradeSource {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    fn field_mapping(&self) -> FieldMapping {
        self.batch.read().mapping.clone()
    }

    async fn fetch_records(&self) -> Result<RawTradeBatch, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }
        Ok(self.batch.read().clone())
    }
}
