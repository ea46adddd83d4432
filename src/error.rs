use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// These are the only errors allowed to abort process startup. They are
/// raised at construction/load time and never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors crossing the outbound exchange-session port.
///
/// Every variant is classified along two axes:
///
/// - [`is_transient`](Self::is_transient) — worth retrying with backoff
///   (timeouts, transient network failures, exchange-side throttling).
/// - [`is_fatal`](Self::is_fatal) — the session handle itself is broken
///   (credentials revoked); the gateway drops it and establishes a fresh
///   session on the next call instead of retrying against a dead handle.
///
/// Variants that are neither are permanent per-call failures: not retried,
/// absorbed into the operation's empty/absent outcome.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by exchange")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("exchange API error {code}: {message}")]
    Api { code: i64, message: String },
}

impl SessionError {
    /// Whether this failure is worth retrying with backoff.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Network(_) | Self::RateLimited { .. }
        )
    }

    /// Whether the underlying session handle is unusable.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
