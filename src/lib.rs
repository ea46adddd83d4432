//! Gateward — rate-limited exchange account gateway.
//!
//! The gateway is the single point where credentials, rate limits, and the
//! exchange's mutable external state (balances, tickers, markets) are
//! mediated for the rest of a trading system. It owns one exchange
//! session, paces every outbound call, retries transient failures with
//! bounded backoff, and re-establishes the session after fatal errors so
//! callers never touch a known-broken handle.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with environment overlay
//! - [`domain`] - Exchange-agnostic types: credentials, balances, tickers, symbols
//! - [`error`] - Error taxonomy: configuration vs. transient vs. permanent failures
//! - [`gateway`] - The gateway itself plus its rate limiter and retry policy
//! - [`port`] - Trait seams where exchange adapters plug in
//! - [`adapter`] - REST implementations (Binance spot, Bybit v5) and the CLI
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use gateward::adapter::outbound::rest::RestConnector;
//! use gateward::config::{Exchange, HttpConfig};
//! use gateward::domain::Credentials;
//! use gateward::gateway::{ExchangeGateway, GatewayConfig};
//!
//! # async fn run() -> gateward::error::Result<()> {
//! let credentials = Credentials::new("key", "secret", true)?;
//! let connector = RestConnector::new(Exchange::Bybit, credentials, HttpConfig::default());
//! let gateway = ExchangeGateway::new(Arc::new(connector), &GatewayConfig::default());
//!
//! if gateway.test_connection().await {
//!     let balance = gateway.balance().await;
//!     println!("holding {} assets", balance.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
