//! Configuration module for the dashboard service.
//!
//! YAML configuration with environment variable interpolation and
//! validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trade_dashboard::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("HTTP port: {}", config.server.http_port);
//! ```

mod bot;
mod http;
mod metrics;
mod normalization;
mod observability;
mod refresh;
mod server;
mod source;

use std::net::SocketAddr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bot::BotConfig;
pub use http::{HttpClientConfig, RetryConfig};
pub use metrics::MetricsSettings;
pub use normalization::NormalizationConfig;
pub use observability::{LoggingConfig, ObservabilityConfig, PrometheusConfig};
pub use refresh::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS, RefreshConfig};
pub use server::ServerConfig;
pub use source::{
    AirtableConfig, BotApiSourceConfig, GoogleSheetsConfig, InMemorySourceConfig, SourceConfig,
    SupabaseConfig,
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Active trade data source.
    #[serde(default)]
    pub source: SourceConfig,
    /// Normalization defaults.
    #[serde(default)]
    pub normalization: NormalizationConfig,
    /// Metric settings.
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// Refresh loop.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Remote bot control.
    #[serde(default)]
    pub bot: BotConfig,
    /// Outbound HTTP client.
    #[serde(default)]
    pub http: HttpClientConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$DASHBOARD_CONFIG`,
///   then "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        str::to_string,
    );

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Convert a configured number to a decimal, dropping float noise.
#[must_use]
pub fn config_decimal(value: f64) -> Decimal {
    Decimal::try_from(value)
        .map(|d| d.round_dp(8).normalize())
        .unwrap_or(Decimal::ZERO)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let var_name = cap.get(1).map_or("", |m| m.as_str());
        let default_value = cap.get(2).map(|m| m.as_str());

        match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    let width = config.metrics.histogram_bucket_width;
    if !width.is_finite() || width <= 0.0 {
        return invalid("metrics.histogram_bucket_width must be positive");
    }

    let stop = config.metrics.default_stop_loss;
    if !stop.is_finite() || stop < 0.0 {
        return invalid("metrics.default_stop_loss must not be negative");
    }

    if config.normalization.default_symbol.trim().is_empty() {
        return invalid("normalization.default_symbol must not be empty");
    }

    if !config.normalization.initial_account_value.is_finite() {
        return invalid("normalization.initial_account_value must be a finite number");
    }

    let interval = config.refresh.interval_secs;
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&interval) {
        return Err(ConfigError::ValidationError(format!(
            "refresh.interval_secs must be between {MIN_INTERVAL_SECS} and {MAX_INTERVAL_SECS}"
        )));
    }

    if config.refresh.fetch_timeout_secs == 0 {
        return invalid("refresh.fetch_timeout_secs must be positive");
    }

    if config.bot.timeout_secs == 0 {
        return invalid("bot.timeout_secs must be positive");
    }

    if config.http.retry.max_attempts == 0 {
        return invalid("http.retry.max_attempts must be at least 1");
    }

    if !config.http.retry.multiplier.is_finite() || config.http.retry.multiplier < 1.0 {
        return invalid("http.retry.multiplier must be at least 1.0");
    }

    validate_source(&config.source)?;

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    if config.server.socket_addr().is_err() {
        return Err(ConfigError::ValidationError(format!(
            "server.bind_address is not an IP address: {}",
            config.server.bind_address
        )));
    }

    let prometheus = &config.observability.prometheus;
    if prometheus.enabled {
        let addr: SocketAddr = prometheus.listen_address.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "observability.prometheus.listen_address is not a socket address: {}",
                prometheus.listen_address
            ))
        })?;
        if addr.port() == config.server.http_port {
            return invalid("prometheus port and http_port must be different");
        }
    }

    Ok(())
}

fn validate_source(source: &SourceConfig) -> Result<(), ConfigError> {
    let require = |value: &str, field: &str| {
        if value.trim().is_empty() {
            Err(ConfigError::ValidationError(format!(
                "source.{field} is required for {} sources",
                source.kind()
            )))
        } else {
            Ok(())
        }
    };

    match source {
        SourceConfig::GoogleSheets(c) => {
            require(&c.api_key, "api_key")?;
            require(&c.spreadsheet_id, "spreadsheet_id")?;
            require(&c.range, "range")
        }
        SourceConfig::Airtable(c) => {
            require(&c.api_key, "api_key")?;
            require(&c.base_id, "base_id")?;
            require(&c.table, "table")?;
            if !(1..=100).contains(&c.page_size) {
                return Err(ConfigError::ValidationError(
                    "source.page_size must be between 1 and 100".to_string(),
                ));
            }
            Ok(())
        }
        SourceConfig::Supabase(c) => {
            require(&c.url, "url")?;
            require(&c.api_key, "api_key")?;
            require(&c.table, "table")
        }
        SourceConfig::BotApi(c) => require(&c.base_url, "base_url"),
        SourceConfig::InMemory(_) => Ok(()),
    }
}
