//! REST adapter for the exchange session port.
//!
//! One [`SessionConnector`] covering both supported profiles. Each
//! `connect()` builds a fresh HTTP client and a profile-specific session,
//! so a handle dropped by the gateway after a fatal error is fully
//! replaced rather than patched up.

mod binance;
mod bybit;
mod sign;

pub use binance::BinanceSession;
pub use bybit::BybitSession;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::info;

use crate::config::{Config, Exchange, HttpConfig};
use crate::domain::Credentials;
use crate::error::{ConfigError, SessionError};
use crate::port::outbound::session::{ExchangeSession, SessionConnector};

/// Connector binding an exchange profile, credentials, and HTTP tuning.
pub struct RestConnector {
    exchange: Exchange,
    credentials: Credentials,
    http: HttpConfig,
}

impl RestConnector {
    #[must_use]
    pub fn new(exchange: Exchange, credentials: Credentials, http: HttpConfig) -> Self {
        Self {
            exchange,
            credentials,
            http,
        }
    }

    /// Build a connector from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when credentials are missing or invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.exchange.profile,
            config.credentials()?,
            config.http.clone(),
        ))
    }
}

#[async_trait]
impl SessionConnector for RestConnector {
    async fn connect(&self) -> Result<Arc<dyn ExchangeSession>, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.http.timeout_ms))
            .connect_timeout(Duration::from_millis(self.http.connect_timeout_ms))
            .build()
            .map_err(|err| SessionError::Network(err.to_string()))?;

        let session: Arc<dyn ExchangeSession> = match self.exchange {
            Exchange::Binance => Arc::new(BinanceSession::new(client, self.credentials.clone())),
            Exchange::Bybit => Arc::new(BybitSession::new(client, self.credentials.clone())),
        };

        info!(
            exchange = self.exchange.name(),
            testnet = self.credentials.testnet(),
            key = %self.credentials.masked_key(),
            "established exchange session"
        );
        Ok(session)
    }

    fn exchange_name(&self) -> &'static str {
        self.exchange.name()
    }
}

/// Map a transport-level failure onto the session taxonomy.
pub(crate) fn map_transport_error(err: &reqwest::Error) -> SessionError {
    if err.is_timeout() {
        SessionError::Timeout
    } else {
        SessionError::Network(err.to_string())
    }
}

/// Map a non-success HTTP status onto the session taxonomy.
///
/// Used as the fallback when the response body carries no parseable
/// exchange error payload.
pub(crate) fn classify_status(
    status: StatusCode,
    retry_after_ms: Option<u64>,
    body: &str,
) -> SessionError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SessionError::Auth(truncate(body, 200))
        }
        StatusCode::TOO_MANY_REQUESTS => SessionError::RateLimited { retry_after_ms },
        StatusCode::REQUEST_TIMEOUT => SessionError::Timeout,
        s if s.is_server_error() => SessionError::Network(format!("HTTP {s}")),
        s => SessionError::Api {
            code: i64::from(s.as_u16()),
            message: truncate(body, 200),
        },
    }
}

fn truncate(body: &str, max: usize) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= max {
        trimmed.to_string()
    } else {
        let mut end = max;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_string()
    }
}

/// Read the `Retry-After` header as milliseconds, if present.
pub(crate) fn retry_after_ms(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|secs| secs * 1_000)
}
