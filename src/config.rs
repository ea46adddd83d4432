//! Configuration loading from TOML files with environment overlay.
//!
//! The config loader is the only place raw environment text is parsed.
//! The gateway core receives a validated [`Credentials`] value and typed
//! tuning sections, never `std::env` reads.

use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::Credentials;
use crate::error::ConfigError;

/// Supported exchange profiles.
///
/// Both profiles share the same credentials shape and gateway behavior;
/// they differ in endpoints, signing scheme, and the environment variables
/// their keys are conventionally stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    Binance,
    Bybit,
}

impl Exchange {
    /// Display name used in logs and status output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::Bybit => "Bybit",
        }
    }

    /// Environment variable holding this profile's API key.
    #[must_use]
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::Binance => "BINANCE_API_KEY",
            Self::Bybit => "BYBIT_API_KEY",
        }
    }

    /// Environment variable holding this profile's API secret.
    #[must_use]
    pub const fn api_secret_var(self) -> &'static str {
        match self {
            Self::Binance => "BINANCE_API_SECRET",
            Self::Bybit => "BYBIT_SECRET_KEY",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Exchange profile selection and account binding.
#[derive(Debug, Deserialize)]
pub struct ExchangeConfig {
    pub profile: Exchange,
    #[serde(default = "default_testnet")]
    pub testnet: bool,
    /// Symbol used when a command does not name one (the account's primary
    /// trading pair).
    #[serde(default = "default_symbol")]
    pub default_symbol: String,
    /// API key; usually left empty in the file and supplied via the
    /// profile's environment variable.
    #[serde(default)]
    pub api_key: String,
    /// API secret; same sourcing as `api_key`.
    #[serde(default)]
    pub api_secret: String,
}

fn default_testnet() -> bool {
    true
}

fn default_symbol() -> String {
    "BTCUSDT".into()
}

/// Outbound request pacing.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Calls allowed per one-second window.
    pub requests_per_second: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
        }
    }
}

/// Retry and backoff policy for transient failures.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after the initial attempt (budget N means N + 1 attempts).
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 250,
            backoff_multiplier: 2.0,
            max_backoff_ms: 5_000,
        }
    }
}

/// HTTP client tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Bound on each network call; a timeout is treated as transient.
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, apply the environment overlay,
    /// and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, if an
    /// environment flag is unparseable, or if validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay secrets and the environment flag from process environment.
    ///
    /// File values act as defaults; a set environment variable wins.
    fn apply_env(&mut self) -> Result<(), ConfigError> {
        let profile = self.exchange.profile;

        if let Ok(key) = env::var(profile.api_key_var()) {
            self.exchange.api_key = key;
        }
        if let Ok(secret) = env::var(profile.api_secret_var()) {
            self.exchange.api_secret = secret;
        }
        if let Ok(flag) = env::var("TESTNET") {
            self.exchange.testnet = parse_bool(&flag).ok_or_else(|| {
                ConfigError::InvalidValue {
                    field: "testnet",
                    reason: format!("cannot parse {flag:?} as a boolean"),
                }
            })?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.requests_per_second == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit.requests_per_second",
                reason: "must be at least 1".into(),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_multiplier",
                reason: "must be at least 1.0".into(),
            });
        }
        if self.http.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_ms",
                reason: "must be nonzero".into(),
            });
        }
        if self.exchange.default_symbol.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "exchange.default_symbol",
            });
        }
        Ok(())
    }

    /// Validated credentials for the selected profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when either key field is empty
    /// after both the file and the environment have been consulted.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Credentials::new(
            self.exchange.api_key.clone(),
            self.exchange.api_secret.clone(),
            self.exchange.testnet,
        )
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
