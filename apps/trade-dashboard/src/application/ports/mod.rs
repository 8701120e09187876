//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the dashboard reads
//! from and controls.

mod bot_control_port;
mod trade_source_port;

pub use bot_control_port::{BotControlError, BotControlPort, BotStatus};
pub use trade_source_port::{DataSourceError, TradeDataSourcePort};
