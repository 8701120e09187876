//! Normalization errors.

use thiserror::Error;

/// Why a raw record could not become a canonical trade.
///
/// Only ordering-breaking problems end up here; malformed numeric
/// fields are recovered as zero.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The record carries no timestamp at all.
    #[error("record has no timestamp")]
    MissingTimestamp,

    /// The timestamp could not be parsed.
    #[error("unparseable timestamp: {raw}")]
    InvalidTimestamp {
        /// Raw value as delivered.
        raw: String,
    },

    /// The record shape does not match the source's field mapping.
    #[error("{record} record cannot be read with a {mapping} mapping")]
    MappingMismatch {
        /// Record kind.
        record: &'static str,
        /// Mapping kind.
        mapping: &'static str,
    },
}
