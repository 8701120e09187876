//! Normalization defaults for fields a source does not report.

use serde::{Deserialize, Serialize};

/// Normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationConfig {
    /// Symbol for records without one.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    /// Starting account balance, base for derived cumulative ROI.
    #[serde(default = "default_initial_account_value")]
    pub initial_account_value: f64,
    /// Whether the first spreadsheet row holds column titles.
    #[serde(default = "default_true")]
    pub skip_header_row: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            default_symbol: default_symbol(),
            initial_account_value: default_initial_account_value(),
            skip_header_row: true,
        }
    }
}

fn default_symbol() -> String {
    "SOL".to_string()
}

const fn default_initial_account_value() -> f64 {
    14.58
}

pub(crate) const fn default_true() -> bool {
    true
}
