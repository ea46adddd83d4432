//! Binance spot REST session.
//!
//! Authenticated endpoints use a signed query string (HMAC-SHA256 over the
//! query, hex-encoded) plus the `X-MBX-APIKEY` header. The testnet flag
//! selects Binance's spot sandbox.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{classify_status, map_transport_error, retry_after_ms, sign};
use crate::domain::{Credentials, Ticker};
use crate::error::SessionError;
use crate::port::outbound::session::{AssetTotal, ExchangeSession, MarketEntry};

const LIVE_URL: &str = "https://api.binance.com";
const TESTNET_URL: &str = "https://testnet.binance.vision";
const RECV_WINDOW_MS: u64 = 5_000;

/// Session against the Binance spot API.
pub struct BinanceSession {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl BinanceSession {
    #[must_use]
    pub fn new(http: Client, credentials: Credentials) -> Self {
        let base_url = if credentials.testnet() {
            TESTNET_URL
        } else {
            LIVE_URL
        };
        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Append timestamp, receive window, and signature to a query string.
    fn signed_query(&self, params: &str) -> Result<String, SessionError> {
        let timestamp = Utc::now().timestamp_millis();
        let query = if params.is_empty() {
            format!("recvWindow={RECV_WINDOW_MS}&timestamp={timestamp}")
        } else {
            format!("{params}&recvWindow={RECV_WINDOW_MS}&timestamp={timestamp}")
        };
        let signature = sign::hmac_sha256_hex(self.credentials.api_secret(), &query)?;
        Ok(format!("{query}&signature={signature}"))
    }

    async fn get(&self, path_and_query: &str, authenticated: bool) -> Result<String, SessionError> {
        let url = format!("{}{path_and_query}", self.base_url);
        let mut request = self.http.get(&url);
        if authenticated {
            request = request.header("X-MBX-APIKEY", self.credentials.api_key());
        }

        let response = request
            .send()
            .await
            .map_err(|err| map_transport_error(&err))?;
        let status = response.status();
        let retry_after = retry_after_ms(&response);
        let body = response
            .text()
            .await
            .map_err(|err| map_transport_error(&err))?;

        if status.is_success() {
            Ok(body)
        } else {
            debug!(%status, "Binance request failed");
            Err(map_binance_error(status, retry_after, &body))
        }
    }
}

/// Prefer the exchange's own error payload over the bare HTTP status.
fn map_binance_error(
    status: reqwest::StatusCode,
    retry_after: Option<u64>,
    body: &str,
) -> SessionError {
    if let Ok(err) = serde_json::from_str::<BinanceError>(body) {
        return match err.code {
            // Invalid key, key rejected for this endpoint, bad signature.
            -2014 | -2015 | -1022 => SessionError::Auth(err.msg),
            // Request-weight limit breached.
            -1003 => SessionError::RateLimited {
                retry_after_ms: retry_after,
            },
            code => SessionError::Api {
                code,
                message: err.msg,
            },
        };
    }
    classify_status(status, retry_after, body)
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, SessionError> {
    serde_json::from_str(body).map_err(|err| SessionError::MalformedPayload(err.to_string()))
}

#[async_trait]
impl ExchangeSession for BinanceSession {
    async fn fetch_balance(&self) -> Result<Vec<AssetTotal>, SessionError> {
        let query = self.signed_query("")?;
        let body = self.get(&format!("/api/v3/account?{query}"), true).await?;
        let account: AccountResponse = parse(&body)?;
        Ok(account
            .balances
            .into_iter()
            .map(|b| AssetTotal::new(b.asset, b.free + b.locked))
            .collect())
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, SessionError> {
        let body = self
            .get(&format!("/api/v3/ticker/24hr?symbol={symbol}"), false)
            .await
            .map_err(|err| match err {
                // -1121: invalid symbol.
                SessionError::Api { code: -1121, .. } => SessionError::SymbolNotFound {
                    symbol: symbol.to_owned(),
                },
                other => other,
            })?;
        let ticker: TickerResponse = parse(&body)?;
        Ok(Ticker {
            symbol: ticker.symbol,
            last_price: ticker.last_price,
            percent_change_24h: ticker.price_change_percent,
            timestamp_ms: ticker.close_time,
        })
    }

    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>, SessionError> {
        let body = self.get("/api/v3/exchangeInfo", false).await?;
        let info: ExchangeInfoResponse = parse(&body)?;
        Ok(info
            .symbols
            .into_iter()
            .filter(|s| s.status == "TRADING")
            .map(|s| MarketEntry::new(s.symbol))
            .collect())
    }

    fn exchange_name(&self) -> &'static str {
        "Binance"
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    balances: Vec<AccountBalance>,
}

#[derive(Debug, Deserialize)]
struct AccountBalance {
    asset: String,
    free: Decimal,
    locked: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    symbol: String,
    last_price: Decimal,
    price_change_percent: Decimal,
    close_time: i64,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    status: String,
}
