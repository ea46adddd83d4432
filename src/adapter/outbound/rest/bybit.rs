//! Bybit v5 REST session.
//!
//! Authenticated requests carry `X-BAPI-*` headers; the signature is
//! HMAC-SHA256 over `timestamp + api_key + recv_window + query_string`.
//! Bybit wraps every payload in a `retCode`/`retMsg` envelope, so API
//! errors arrive with HTTP 200 and are classified by return code.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{classify_status, map_transport_error, retry_after_ms, sign};
use crate::domain::{Credentials, Ticker};
use crate::error::SessionError;
use crate::port::outbound::session::{AssetTotal, ExchangeSession, MarketEntry};

const LIVE_URL: &str = "https://api.bybit.com";
const TESTNET_URL: &str = "https://api-testnet.bybit.com";
const RECV_WINDOW_MS: u64 = 5_000;

/// Session against the Bybit v5 unified API.
pub struct BybitSession {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl BybitSession {
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

    /// Issue a GET and unwrap Bybit's `retCode`/`retMsg` envelope.
    ///
    /// Returns the typed `result` payload and the server timestamp. The
    /// envelope is decoded before the payload so error responses (which
    /// carry an empty `result`) classify by return code instead of failing
    /// as malformed.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        authenticated: bool,
    ) -> Result<(T, Option<i64>), SessionError> {
        let url = if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}{path}?{query}", self.base_url)
        };

        let mut request = self.http.get(&url);
        if authenticated {
            let timestamp = Utc::now().timestamp_millis();
            let payload = format!(
                "{timestamp}{}{RECV_WINDOW_MS}{query}",
                self.credentials.api_key()
            );
            let signature = sign::hmac_sha256_hex(self.credentials.api_secret(), &payload)?;
            request = request
                .header("X-BAPI-API-KEY", self.credentials.api_key())
                .header("X-BAPI-SIGN", signature)
                .header("X-BAPI-TIMESTAMP", timestamp.to_string())
                .header("X-BAPI-RECV-WINDOW", RECV_WINDOW_MS.to_string());
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

        if !status.is_success() {
            debug!(%status, "Bybit request failed");
            return Err(classify_status(status, retry_after, &body));
        }

        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|err| SessionError::MalformedPayload(err.to_string()))?;
        if envelope.ret_code != 0 {
            return Err(map_ret_code(envelope.ret_code, envelope.ret_msg));
        }
        let result: T = serde_json::from_value(envelope.result)
            .map_err(|err| SessionError::MalformedPayload(err.to_string()))?;
        Ok((result, envelope.time))
    }
}

/// Classify a nonzero Bybit return code.
fn map_ret_code(code: i64, message: String) -> SessionError {
    match code {
        // Invalid key, invalid signature, key expired, IP not allowed.
        10003 | 10004 | 10005 | 10010 | 33004 => SessionError::Auth(message),
        // Too many visits / IP rate limit.
        10006 | 10018 => SessionError::RateLimited {
            retry_after_ms: None,
        },
        code => SessionError::Api { code, message },
    }
}

fn parse_quantity(raw: &str) -> Result<Decimal, SessionError> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    raw.parse()
        .map_err(|_| SessionError::MalformedPayload(format!("bad quantity {raw:?}")))
}

#[async_trait]
impl ExchangeSession for BybitSession {
    async fn fetch_balance(&self) -> Result<Vec<AssetTotal>, SessionError> {
        let (result, _): (WalletBalanceResult, _) = self
            .get_envelope("/v5/account/wallet-balance", "accountType=UNIFIED", true)
            .await?;

        let mut totals = Vec::new();
        for account in result.list {
            for coin in account.coin {
                totals.push(AssetTotal::new(
                    coin.coin,
                    parse_quantity(&coin.wallet_balance)?,
                ));
            }
        }
        Ok(totals)
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, SessionError> {
        let query = format!("category=spot&symbol={symbol}");
        let (result, time): (TickerResult, _) = self
            .get_envelope("/v5/market/tickers", &query, false)
            .await
            .map_err(|err| match err {
                // 10001: request parameter error (unknown symbol included).
                SessionError::Api { code: 10001, .. } => SessionError::SymbolNotFound {
                    symbol: symbol.to_owned(),
                },
                other => other,
            })?;

        let entry = result.list.into_iter().next().ok_or_else(|| {
            SessionError::SymbolNotFound {
                symbol: symbol.to_owned(),
            }
        })?;

        Ok(Ticker {
            symbol: entry.symbol,
            last_price: entry.last_price,
            // Bybit reports the 24h change as a fraction (0.0135 = 1.35%).
            percent_change_24h: entry.price_24h_pcnt * Decimal::ONE_HUNDRED,
            timestamp_ms: time.unwrap_or_default(),
        })
    }

    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>, SessionError> {
        let (result, _): (InstrumentsResult, _) = self
            .get_envelope(
                "/v5/market/instruments-info",
                "category=spot&limit=1000",
                false,
            )
            .await?;

        Ok(result
            .list
            .into_iter()
            .filter(|i| i.status == "Trading")
            .map(|i| MarketEntry::new(i.symbol))
            .collect())
    }

    fn exchange_name(&self) -> &'static str {
        "Bybit"
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "retCode")]
    ret_code: i64,
    #[serde(rename = "retMsg")]
    ret_msg: String,
    #[serde(default)]
    result: serde_json::Value,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WalletBalanceResult {
    list: Vec<WalletAccount>,
}

#[derive(Debug, Deserialize)]
struct WalletAccount {
    coin: Vec<WalletCoin>,
}

#[derive(Debug, Deserialize)]
struct WalletCoin {
    coin: String,
    #[serde(rename = "walletBalance")]
    wallet_balance: String,
}

#[derive(Debug, Deserialize)]
struct TickerResult {
    list: Vec<TickerEntry>,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    symbol: String,
    #[serde(rename = "lastPrice")]
    last_price: Decimal,
    #[serde(rename = "price24hPcnt")]
    price_24h_pcnt: Decimal,
}

#[derive(Debug, Deserialize)]
struct InstrumentsResult {
    list: Vec<Instrument>,
}

#[derive(Debug, Deserialize)]
struct Instrument {
    symbol: String,
    status: String,
}
