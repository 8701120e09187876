//! Metric computation settings.

use serde::{Deserialize, Serialize};

/// Metric settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Stop loss percentage shown when the source reports none.
    #[serde(default = "default_stop_loss")]
    pub default_stop_loss: f64,
    /// Profit histogram bin width in percentage points.
    #[serde(default = "default_bucket_width")]
    pub histogram_bucket_width: f64,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            default_stop_loss: default_stop_loss(),
            histogram_bucket_width: default_bucket_width(),
        }
    }
}

const fn default_stop_loss() -> f64 {
    2.5
}

const fn default_bucket_width() -> f64 {
    2.0
}
