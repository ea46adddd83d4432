//! Exchange session port.
//!
//! This module defines the traits for the gateway's single outbound
//! dependency: an authenticated session against one exchange environment.
//! A REST adapter implements them for real exchanges; the testkit provides
//! scripted mocks.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Ticker;
use crate::error::SessionError;

/// One exchange-reported asset total, zero quantities included.
///
/// Filtering to held assets is the gateway's job, not the session's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTotal {
    /// Asset symbol (e.g., "BTC").
    pub asset: String,
    /// Total quantity as reported by the exchange.
    pub total: Decimal,
}

impl AssetTotal {
    #[must_use]
    pub fn new(asset: impl Into<String>, total: Decimal) -> Self {
        Self {
            asset: asset.into(),
            total,
        }
    }
}

/// One entry of the exchange's market list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketEntry {
    /// Trading symbol identifier.
    pub symbol: String,
}

impl MarketEntry {
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

/// An authenticated session against one exchange environment.
///
/// Implementations are bound to a specific exchange and environment
/// (testnet vs. live) at construction and must be safe to share across
/// concurrent callers. All pacing, retry, and failure absorption happen
/// in the gateway; sessions just perform one call and report a typed
/// [`SessionError`] on failure.
#[async_trait]
pub trait ExchangeSession: Send + Sync {
    /// Fetch the full account balance, zero quantities included.
    async fn fetch_balance(&self) -> Result<Vec<AssetTotal>, SessionError>;

    /// Fetch a single symbol's ticker.
    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, SessionError>;

    /// Fetch the exchange's market list.
    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>, SessionError>;

    /// Exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}

/// Establishes fresh [`ExchangeSession`] handles.
///
/// The gateway calls this lazily on first use and again after a fatal
/// session error, so a known-broken handle is never reused.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Establish a new session.
    async fn connect(&self) -> Result<Arc<dyn ExchangeSession>, SessionError>;

    /// Exchange name for logging/debugging.
    fn exchange_name(&self) -> &'static str;
}
