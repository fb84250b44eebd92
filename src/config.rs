//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;
use crate::snapshot::DASHBOARD_ENDPOINT;
use crate::format::{
    parse_utc_offset, DisplayOptions, DisplayZone, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TIMESTAMP_PATTERN,
};
use crate::refresh::OverlapPolicy;
use crate::updater::UpdaterConfig;

/// Longest accepted refresh interval (one day)
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Longest accepted request timeout (one hour)
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 3_600;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how often to poll
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub overlap: OverlapPolicy,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_endpoint() -> String {
    DASHBOARD_ENDPOINT.to_string()
}

fn default_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            interval_secs: default_interval(),
            request_timeout_secs: default_request_timeout(),
            overlap: OverlapPolicy::default(),
        }
    }
}

/// How values are shown
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Fixed offset such as "+09:00"; the system time zone when unset or "local"
    #[serde(default)]
    pub utc_offset: Option<String>,

    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_PATTERN.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            utc_offset: None,
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `path` and apply environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut config = Self::load(path)?;
        let errors = config.apply_env_overrides();
        Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            errors,
        })
    }

    /// Load from default locations or environment
    pub fn load_default() -> LoadedConfig {
        Self::load_first(&default_paths())
    }

    /// Load the first of `paths` that parses, then apply environment
    /// overrides. Nothing is logged here since this runs before logging is
    /// set up; problems are collected in [`LoadedConfig::errors`].
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut errors = Vec::new();
        let mut found = None;

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load(path) {
                Ok(config) => {
                    found = Some((config, path.clone()));
                    break;
                }
                Err(e) => errors.push(e),
            }
        }

        let (mut config, source) = match found {
            Some((config, path)) => (config, Some(path)),
            None => (Config::default(), None),
        };
        errors.extend(config.apply_env_overrides());

        LoadedConfig { config, source, errors }
    }

    /// Apply environment variable overrides to an existing config.
    /// Returns the variables that were set but ignored.
    pub fn apply_env_overrides(&mut self) -> Vec<ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Vec<ConfigError> {
        let mut ignored = Vec::new();

        // Poller overrides
        if let Some(url) = lookup("LPDASH_BASE_URL") {
            self.poller.base_url = url;
        }
        if let Some(endpoint) = lookup("LPDASH_ENDPOINT") {
            self.poller.endpoint = endpoint;
        }
        if let Some(raw) = lookup("LPDASH_INTERVAL_SECS") {
            match raw.parse() {
                Ok(secs) => self.poller.interval_secs = secs,
                Err(e) => ignored.push(ignored_var("LPDASH_INTERVAL_SECS", &raw, e)),
            }
        }
        if let Some(raw) = lookup("LPDASH_TIMEOUT_SECS") {
            match raw.parse() {
                Ok(secs) => self.poller.request_timeout_secs = secs,
                Err(e) => ignored.push(ignored_var("LPDASH_TIMEOUT_SECS", &raw, e)),
            }
        }
        if let Some(raw) = lookup("LPDASH_OVERLAP") {
            match raw.parse() {
                Ok(policy) => self.poller.overlap = policy,
                Err(e) => ignored.push(ignored_var("LPDASH_OVERLAP", &raw, e)),
            }
        }

        // Display overrides
        if let Some(symbol) = lookup("LPDASH_CURRENCY") {
            self.display.currency_symbol = symbol;
        }
        if let Some(offset) = lookup("LPDASH_UTC_OFFSET") {
            self.display.utc_offset = Some(offset);
        }

        // Logging overrides
        if let Some(level) = lookup("LPDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LPDASH_LOG_FORMAT") {
            self.logging.format = format;
        }

        ignored
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("poller.interval_secs", self.poller.interval_secs, MAX_INTERVAL_SECS)?;
        check_range(
            "poller.request_timeout_secs",
            self.poller.request_timeout_secs,
            MAX_REQUEST_TIMEOUT_SECS,
        )?;
        self.display.to_options()?;
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.poller.base_url.clone(),
            endpoint: self.poller.endpoint.clone(),
            request_timeout_ms: self.poller.request_timeout_secs.saturating_mul(1000),
        }
    }

    pub fn updater_config(&self) -> Result<UpdaterConfig, ConfigError> {
        Ok(UpdaterConfig {
            interval: Duration::from_secs(self.poller.interval_secs.max(1)),
            overlap: self.poller.overlap,
            display: self.display.to_options()?,
        })
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid {
            field,
            error: format!("must be between 1 and {}, got {}", max, value),
        });
    }
    Ok(())
}

fn ignored_var(name: &'static str, raw: &str, error: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        field: name,
        error: format!("ignoring '{}': {}", raw, error),
    }
}

/// Standard config file locations, in search order
pub fn default_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("lpdash").join("config.toml")),
        Some(PathBuf::from("/etc/lpdash/config.toml")),
        Some(PathBuf::from("./config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// A loaded config and what happened while loading it
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from, `None` for defaults
    pub source: Option<PathBuf>,
    /// Config files that could not be loaded and ignored overrides
    pub errors: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Report how the config was loaded. Call once logging is installed.
    pub fn log(&self) {
        for error in &self.errors {
            tracing::warn!("{}", error);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

impl DisplayConfig {
    /// Resolve into display options
    pub fn to_options(&self) -> Result<DisplayOptions, ConfigError> {
        let mut options = DisplayOptions {
            currency_symbol: self.currency_symbol.clone(),
            timestamp_pattern: self.timestamp_format.clone(),
            ..Default::default()
        };

        if let Some(raw) = self.utc_offset.as_deref() {
            if !raw.eq_ignore_ascii_case("local") {
                let offset = parse_utc_offset(raw).ok_or_else(|| ConfigError::Invalid {
                    field: "display.utc_offset",
                    error: format!("'{}' is not an offset like +09:00", raw),
                })?;
                options.zone = DisplayZone::Fixed(offset);
            }
        }

        Ok(options)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# lpdash Configuration
#
# Environment variables override these settings:
# - LPDASH_BASE_URL
# - LPDASH_ENDPOINT
# - LPDASH_INTERVAL_SECS
# - LPDASH_TIMEOUT_SECS
# - LPDASH_OVERLAP
# - LPDASH_CURRENCY
# - LPDASH_UTC_OFFSET
# - LPDASH_LOG_LEVEL
# - LPDASH_LOG_FORMAT

[poller]
# Monitoring API base URL
base_url = "http://localhost:5000"

# Dashboard endpoint path
endpoint = "/api/dashboard_data"

# Seconds between refreshes
interval_secs = 30

# Request timeout in seconds
request_timeout_secs = 30

# When a tick fires while a refresh is still running:
# skip (wait for the running one) or replace (cancel it and start over)
overlap = "skip"

[display]
# Prefix for currency amounts
currency_symbol = "$"

# Fixed offset for transaction timestamps, e.g. "+09:00"
# (default: system time zone, including its DST rules)
# utc_offset = "+09:00"

# chrono strftime pattern for transaction timestamps
timestamp_format = "%Y/%-m/%-d %-H:%M:%S"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
