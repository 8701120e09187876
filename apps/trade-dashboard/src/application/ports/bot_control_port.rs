//! Bot Control Port (Driven Port)
//!
//! Interface for switching the remote trading bot on and off.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State reported by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStatus {
    /// Whether the bot is trading.
    pub enabled: bool,
    /// Configured leverage, when reported.
    #[serde(default)]
    pub leverage: Option<Decimal>,
}

/// Bot control error.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BotControlError {
    /// No bot endpoint configured.
    #[error("bot control is not configured")]
    NotConfigured,

    /// Bot could not be reached.
    #[error("bot unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Bot answered but did not reach the requested state.
    #[error("bot did not switch {requested}")]
    ToggleRejected {
        /// Requested state, `on` or `off`.
        requested: &'static str,
    },

    /// Response body could not be understood.
    #[error("invalid response from bot: {message}")]
    InvalidResponse {
        /// Error details.
        message: String,
    },
}

/// Port for controlling the bot.
#[async_trait]
pub trait BotControlPort: Send + Sync {
    /// Current status.
    async fn status(&self) -> Result<BotStatus, BotControlError>;

    /// Enable trading.
    async fn turn_on(&self) -> Result<BotStatus, BotControlError>;

    /// Disable trading.
    async fn turn_off(&self) -> Result<BotStatus, BotControlError>;
}
