//! Position direction of a trade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction held by the bot when the trade closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Position {
    /// Long position.
    Long,
    /// Short position.
    Short,
    /// Flat, or any unrecognized source value.
    #[default]
    None,
}

impl Position {
    /// Parse a raw source value.
    ///
    /// Trimmed and matched case-insensitively; anything that is not
    /// `long` or `short` normalizes to [`Position::None`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "long" => Self::Long,
            "short" => Self::Short,
            _ => Self::None,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "Long",
            Self::Short => "Short",
            Self::None => "None",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
