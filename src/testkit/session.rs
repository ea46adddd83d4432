//! Mock [`ExchangeSession`] and [`SessionConnector`] implementations.
//!
//! [`ScriptedSession`] pops pre-loaded results per operation (defaulting to
//! a benign success when a queue is exhausted) and records call counts and
//! timestamps. Clones share state, so a test can keep a handle for
//! assertions after moving a clone into a connector.
//!
//! [`ScriptedConnector`] hands out a fresh `Arc` around the same scripted
//! state on every `connect()`, which lets tests distinguish a re-established
//! session from a reused handle.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::Ticker;
use crate::error::SessionError;
use crate::port::outbound::session::{
    AssetTotal, ExchangeSession, MarketEntry, SessionConnector,
};
use crate::testkit::domain;

type Script<T> = Mutex<VecDeque<Result<T, SessionError>>>;

struct Inner {
    balance_results: Script<Vec<AssetTotal>>,
    ticker_results: Script<Ticker>,
    market_results: Script<Vec<MarketEntry>>,
    balance_calls: AtomicU32,
    ticker_calls: AtomicU32,
    market_calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
}

/// A mock session with scripted per-operation results.
///
/// Each call pops the next result from the matching queue; exhausted
/// queues yield benign successes (empty balance, empty market list, a
/// plausible ticker for the requested symbol).
#[derive(Clone)]
pub struct ScriptedSession {
    inner: Arc<Inner>,
}

impl ScriptedSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                balance_results: Mutex::new(VecDeque::new()),
                ticker_results: Mutex::new(VecDeque::new()),
                market_results: Mutex::new(VecDeque::new()),
                balance_calls: AtomicU32::new(0),
                ticker_calls: AtomicU32::new(0),
                market_calls: AtomicU32::new(0),
                call_times: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn with_balance_results(
        self,
        results: Vec<Result<Vec<AssetTotal>, SessionError>>,
    ) -> Self {
        *self.inner.balance_results.lock().unwrap() = results.into();
        self
    }

    #[must_use]
    pub fn with_ticker_results(self, results: Vec<Result<Ticker, SessionError>>) -> Self {
        *self.inner.ticker_results.lock().unwrap() = results.into();
        self
    }

    #[must_use]
    pub fn with_market_results(
        self,
        results: Vec<Result<Vec<MarketEntry>, SessionError>>,
    ) -> Self {
        *self.inner.market_results.lock().unwrap() = results.into();
        self
    }

    /// How many times `fetch_balance` was called.
    #[must_use]
    pub fn balance_calls(&self) -> u32 {
        self.inner.balance_calls.load(Ordering::SeqCst)
    }

    /// How many times `fetch_ticker` was called.
    #[must_use]
    pub fn ticker_calls(&self) -> u32 {
        self.inner.ticker_calls.load(Ordering::SeqCst)
    }

    /// How many times `fetch_markets` was called.
    #[must_use]
    pub fn market_calls(&self) -> u32 {
        self.inner.market_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all operations.
    #[must_use]
    pub fn total_calls(&self) -> u32 {
        self.balance_calls() + self.ticker_calls() + self.market_calls()
    }

    /// Timestamps of every call, in arrival order.
    #[must_use]
    pub fn call_times(&self) -> Vec<Instant> {
        self.inner.call_times.lock().unwrap().clone()
    }

    fn record_call(&self, counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::SeqCst);
        self.inner.call_times.lock().unwrap().push(Instant::now());
    }
}

impl Default for ScriptedSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeSession for ScriptedSession {
    async fn fetch_balance(&self) -> Result<Vec<AssetTotal>, SessionError> {
        self.record_call(&self.inner.balance_calls);
        self.inner
            .balance_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<Ticker, SessionError> {
        self.record_call(&self.inner.ticker_calls);
        self.inner
            .ticker_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(domain::ticker(symbol)))
    }

    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>, SessionError> {
        self.record_call(&self.inner.market_calls);
        self.inner
            .market_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}

/// A mock connector with scripted connect results and a call counter.
///
/// Every successful `connect()` returns a fresh `Arc` around the same
/// scripted session state.
pub struct ScriptedConnector {
    session: ScriptedSession,
    connect_results: Script<()>,
    connect_count: AtomicU32,
}

impl ScriptedConnector {
    #[must_use]
    pub fn new(session: ScriptedSession) -> Self {
        Self {
            session,
            connect_results: Mutex::new(VecDeque::new()),
            connect_count: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_connect_results(self, results: Vec<Result<(), SessionError>>) -> Self {
        *self.connect_results.lock().unwrap() = results.into();
        self
    }

    /// How many times `connect()` was called.
    #[must_use]
    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionConnector for ScriptedConnector {
    async fn connect(&self) -> Result<Arc<dyn ExchangeSession>, SessionError> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.connect_results.lock().unwrap().pop_front() {
            result?;
        }
        Ok(Arc::new(self.session.clone()))
    }

    fn exchange_name(&self) -> &'static str {
        "mock"
    }
}
