//! Domain layer: canonical trades, metrics and derived series.
//!
//! Everything here is pure and synchronous.

pub mod export;
pub mod metrics;
pub mod series;
pub mod shared;
pub mod trade;
