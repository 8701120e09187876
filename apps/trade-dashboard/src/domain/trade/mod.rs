//! Canonical trades and the normalizer that produces them.

mod errors;
mod normalizer;
pub mod parse;
mod position;
mod raw;
mod record;

pub use errors::NormalizeError;
pub use normalizer::{
    DEFAULT_INITIAL_ACCOUNT_VALUE, DEFAULT_SYMBOL, NormalizedBatch, NormalizerOptions,
    RejectedRecord, TradeNormalizer,
};
pub use position::Position;
pub use raw::{ColumnLayout, FieldMapping, FieldNames, RawRecord, RawTradeBatch};
pub use record::{Trade, sort_chronologically};
