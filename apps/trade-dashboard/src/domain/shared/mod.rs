//! Shared Domain Types
//!
//! Value objects shared across the trade, metrics and series contexts.

pub mod value_objects;

pub use value_objects::{Symbol, Timestamp};
