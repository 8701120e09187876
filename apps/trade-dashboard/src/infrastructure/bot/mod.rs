//! Bot control adapters.

mod remote;

use async_trait::async_trait;

pub use remote::RemoteBotControl;

use crate::application::ports::{BotControlError, BotControlPort, BotStatus};
use crate::config::BotConfig;

/// Bot control chosen at start-up.
#[derive(Debug, Clone)]
pub enum ConfiguredBot {
    /// A bot URL is configured.
    Remote(RemoteBotControl),
    /// No bot URL; every call fails with [`BotControlError::NotConfigured`].
    Disabled,
}

impl ConfiguredBot {
    /// Remote control when `bot.base_url` is set, otherwise disabled.
    pub fn from_config(config: &BotConfig) -> Result<Self, BotControlError> {
        match config.base_url() {
            Some(url) => {
                tracing::info!(url, "Bot control enabled");
                Ok(Self::Remote(RemoteBotControl::from_config(config, url)?))
            }
            None => Ok(Self::Disabled),
        }
    }
}

#[async_trait]
impl BotControlPort for ConfiguredBot {
    async fn status(&self) -> Result<BotStatus, BotControlError> {
        match self {
            Self::Remote(bot) => bot.status().await,
            Self::Disabled => Err(BotControlError::NotConfigured),
        }
    }

    async fn turn_on(&self) -> Result<BotStatus, BotControlError> {
        match self {
            Self::Remote(bot) => bot.turn_on().await,
            Self::Disabled => Err(BotControlError::NotConfigured),
        }
    }

    async fn turn_off(&self) -> Result<BotStatus, BotControlError> {
        match self {
            Self::Remote(bot) => bot.turn_off().await,
            Self::Disabled => Err(BotControlError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_without_url() {
        let bot = ConfiguredBot::from_config(&BotConfig {
            base_url: Some("  ".to_string()),
            ..BotConfig::default()
        })
        .unwrap();

        assert!(matches!(bot, ConfiguredBot::Disabled));
        assert_eq!(bot.status().await, Err(BotControlError::NotConfigured));
        assert_eq!(bot.turn_on().await, Err(BotControlError::NotConfigured));
    }

    #[test]
    fn remote_with_url() {
        let bot = ConfiguredBot::from_config(&BotConfig {
            base_url: Some("http://bot:5000/".to_string()),
            ..BotConfig::default()
        })
        .unwrap();
        assert!(matches!(bot, ConfiguredBot::Remote(_)));
    }
}
