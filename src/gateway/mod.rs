//! Exchange account gateway.
//!
//! [`ExchangeGateway`] is the single point where credentials, rate limits,
//! and the exchange's mutable external state are mediated for the rest of
//! the system. It owns one session handle, paces every outbound call
//! through a shared [`RateLimiter`], retries transient failures with
//! bounded exponential backoff, and absorbs everything else into typed
//! empty/absent/false results so callers get one uniform "did it work"
//! check per operation.

pub mod limiter;
pub mod retry;

pub use limiter::RateLimiter;
pub use retry::RetryPolicy;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{Config, HttpConfig, RateLimitConfig, RetryConfig};
use crate::domain::{Balance, SymbolList, Ticker};
use crate::error::SessionError;
use crate::port::outbound::session::{ExchangeSession, SessionConnector};

/// Connection state of the gateway.
///
/// `Disconnected` before the first successful call and after a fatal
/// session error; `Connected` after any operation's first success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Gateway tuning, derived from the relevant [`Config`] sections.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub rate_limit: RateLimitConfig,
    pub retry: RetryConfig,
    /// Bound on each network call, including the adapter's own work.
    pub call_timeout: Duration,
}

impl GatewayConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            rate_limit: config.rate_limit.clone(),
            retry: config.retry.clone(),
            call_timeout: Duration::from_millis(config.http.timeout_ms),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            call_timeout: Duration::from_millis(HttpConfig::default().timeout_ms),
        }
    }
}

/// Rate-limited, self-healing gateway over one exchange session.
///
/// Safe to share (`Arc`) across concurrent callers. The session slot's
/// lock is held only while cloning out or replacing the handle and while
/// establishing a fresh session — never across a data call — so the
/// rate-limited dimension is the only serialization callers observe.
pub struct ExchangeGateway {
    connector: Arc<dyn SessionConnector>,
    limiter: RateLimiter,
    retry: RetryPolicy,
    call_timeout: Duration,
    session: tokio::sync::Mutex<Option<Arc<dyn ExchangeSession>>>,
    state: parking_lot::Mutex<ConnectionState>,
    last_error: parking_lot::Mutex<Option<SessionError>>,
}

impl ExchangeGateway {
    #[must_use]
    pub fn new(connector: Arc<dyn SessionConnector>, config: &GatewayConfig) -> Self {
        Self {
            connector,
            limiter: RateLimiter::from_config(&config.rate_limit),
            retry: RetryPolicy::from_config(&config.retry),
            call_timeout: config.call_timeout,
            session: tokio::sync::Mutex::new(None),
            state: parking_lot::Mutex::new(ConnectionState::Disconnected),
            last_error: parking_lot::Mutex::new(None),
        }
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    /// Cause of the most recent failed operation, if any.
    ///
    /// Cleared on the next successful operation.
    #[must_use]
    pub fn last_error(&self) -> Option<SessionError> {
        self.last_error.lock().clone()
    }

    /// Exchange name of the underlying connector.
    #[must_use]
    pub fn exchange_name(&self) -> &'static str {
        self.connector.exchange_name()
    }

    /// Attempt a lightweight authenticated call (balance fetch).
    ///
    /// Returns `true` only on success. Any failure is recorded internally
    /// (see [`last_error`](Self::last_error)) and never raised.
    pub async fn test_connection(&self) -> bool {
        self.execute("test_connection", |session| async move {
            session.fetch_balance().await.map(|_| ())
        })
        .await
        .is_ok()
    }

    /// Fetch the account balance, filtered to strictly positive quantities.
    ///
    /// Returns the full filtered snapshot or an empty balance on any
    /// failure — never a partial view.
    pub async fn balance(&self) -> Balance {
        match self
            .execute("balance", |session| async move {
                session.fetch_balance().await
            })
            .await
        {
            Ok(totals) => Balance::from_totals(totals.into_iter().map(|t| (t.asset, t.total))),
            Err(_) => Balance::empty(),
        }
    }

    /// Fetch a single symbol's ticker; `None` signals any failure.
    pub async fn ticker(&self, symbol: &str) -> Option<Ticker> {
        let symbol = symbol.to_owned();
        self.execute("ticker", move |session| {
            let symbol = symbol.clone();
            async move { session.fetch_ticker(&symbol).await }
        })
        .await
        .ok()
    }

    /// Fetch the tradable symbol list in exchange-reported order.
    ///
    /// Returns an empty list on any failure.
    pub async fn available_symbols(&self) -> SymbolList {
        match self
            .execute("available_symbols", |session| async move {
                session.fetch_markets().await
            })
            .await
        {
            Ok(markets) => {
                SymbolList::from_exchange_order(markets.into_iter().map(|m| m.symbol))
            }
            Err(_) => SymbolList::empty(),
        }
    }

    /// Run one operation through the limiter, timeout, and retry policy.
    ///
    /// Every attempt (including retries) re-acquires a limiter slot before
    /// touching the session. A fatal error drops the session handle so the
    /// next attempt establishes a fresh one; transient errors retry with
    /// backoff until the budget is exhausted.
    async fn execute<T, F, Fut>(&self, op: &'static str, call: F) -> Result<T, SessionError>
    where
        F: Fn(Arc<dyn ExchangeSession>) -> Fut,
        Fut: Future<Output = Result<T, SessionError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            self.limiter.acquire().await;

            let (outcome, used) = match self.ensure_session().await {
                Ok(session) => {
                    let result =
                        match tokio::time::timeout(self.call_timeout, call(session.clone())).await
                        {
                            Ok(result) => result,
                            Err(_) => Err(SessionError::Timeout),
                        };
                    (result, Some(session))
                }
                Err(err) => (Err(err), None),
            };

            match outcome {
                Ok(value) => {
                    *self.state.lock() = ConnectionState::Connected;
                    *self.last_error.lock() = None;
                    return Ok(value);
                }
                Err(err) if err.is_fatal() => {
                    warn!(op, error = %err, "fatal session error, dropping session");
                    self.invalidate(used.as_ref()).await;
                    *self.last_error.lock() = Some(err.clone());
                    return Err(err);
                }
                Err(err) if err.is_transient() && attempt <= self.retry.max_retries() => {
                    let delay = self.retry.backoff(attempt);
                    debug!(
                        op,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    debug!(op, error = %err, "operation failed");
                    *self.last_error.lock() = Some(err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// Clone out the current session, establishing one if none is held.
    ///
    /// Establishment happens under the slot lock so concurrent callers
    /// never race to create competing sessions.
    async fn ensure_session(&self) -> Result<Arc<dyn ExchangeSession>, SessionError> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }
        let session = self.connector.connect().await?;
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Drop the session handle after a fatal error.
    ///
    /// Only drops the slot if it still holds the handle that failed, so a
    /// fresh session established by a concurrent caller survives a stale
    /// failure report.
    async fn invalidate(&self, failed: Option<&Arc<dyn ExchangeSession>>) {
        let mut slot = self.session.lock().await;
        match (slot.as_ref(), failed) {
            (Some(current), Some(failed)) if Arc::ptr_eq(current, failed) => *slot = None,
            (_, None) => *slot = None,
            _ => {}
        }
        *self.state.lock() = ConnectionState::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal_macros::dec;

    use crate::testkit;
    use crate::testkit::session::{ScriptedConnector, ScriptedSession};

    fn gateway(session: ScriptedSession) -> (ExchangeGateway, Arc<ScriptedConnector>) {
        let connector = Arc::new(ScriptedConnector::new(session));
        let gateway = ExchangeGateway::new(connector.clone(), &testkit::config::gateway());
        (gateway, connector)
    }

    #[tokio::test]
    async fn starts_disconnected() {
        let (gateway, connector) = gateway(ScriptedSession::new());
        assert_eq!(gateway.state(), ConnectionState::Disconnected);
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn first_success_connects() {
        let (gateway, connector) = gateway(ScriptedSession::new());

        assert!(gateway.test_connection().await);
        assert_eq!(gateway.state(), ConnectionState::Connected);
        assert_eq!(connector.connect_count(), 1);
        assert!(gateway.last_error().is_none());
    }

    #[tokio::test]
    async fn session_is_reused_across_operations() {
        let (gateway, connector) = gateway(ScriptedSession::new());

        assert!(gateway.test_connection().await);
        let _ = gateway.balance().await;
        let _ = gateway.available_symbols().await;

        assert_eq!(connector.connect_count(), 1);
    }

    #[tokio::test]
    async fn balance_filters_zero_quantities() {
        let session = ScriptedSession::new().with_balance_results(vec![Ok(vec![
            testkit::domain::total("BTC", dec!(0)),
            testkit::domain::total("ETH", dec!(1.5)),
            testkit::domain::total("USDT", dec!(0)),
        ])]);
        let (gateway, _) = gateway(session);

        let balance = gateway.balance().await;
        assert_eq!(balance.len(), 1);
        assert_eq!(balance.get("ETH"), Some(dec!(1.5)));
    }

    #[tokio::test]
    async fn balance_failure_yields_empty() {
        let session = ScriptedSession::new()
            .with_balance_results(vec![Err(SessionError::MalformedPayload("bad".into()))]);
        let (gateway, _) = gateway(session);

        let balance = gateway.balance().await;
        assert!(balance.is_empty());
        assert!(matches!(
            gateway.last_error(),
            Some(SessionError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn ticker_absent_on_unknown_symbol() {
        let session = ScriptedSession::new().with_ticker_results(vec![Err(
            SessionError::SymbolNotFound {
                symbol: "XXXUSDT".into(),
            },
        )]);
        let (gateway, _) = gateway(session);

        assert!(gateway.ticker("XXXUSDT").await.is_none());
    }

    #[tokio::test]
    async fn symbols_deduplicate_in_order() {
        let session = ScriptedSession::new().with_market_results(vec![Ok(vec![
            testkit::domain::market("ETHUSDT"),
            testkit::domain::market("BTCUSDT"),
            testkit::domain::market("ETHUSDT"),
        ])]);
        let (gateway, _) = gateway(session);

        let symbols = gateway.available_symbols().await;
        let listed: Vec<_> = symbols.iter().collect();
        assert_eq!(listed, vec!["ETHUSDT", "BTCUSDT"]);
    }

    #[tokio::test]
    async fn transient_failures_retry_until_budget() {
        let session = ScriptedSession::new().with_balance_results(vec![
            Err(SessionError::Timeout),
            Err(SessionError::Timeout),
            Err(SessionError::Timeout),
            Ok(vec![testkit::domain::total("BTC", dec!(1))]),
        ]);
        let (gateway, _) = gateway(session.clone());

        let balance = gateway.balance().await;
        assert_eq!(balance.get("BTC"), Some(dec!(1)));
        assert_eq!(session.balance_calls(), 4);
    }

    #[tokio::test]
    async fn retry_budget_exhaustion_surfaces_failure() {
        let session = ScriptedSession::new().with_balance_results(vec![
            Err(SessionError::Timeout),
            Err(SessionError::Timeout),
            Err(SessionError::Timeout),
            Err(SessionError::Timeout),
            Ok(vec![testkit::domain::total("BTC", dec!(1))]),
        ]);
        let (gateway, _) = gateway(session.clone());

        let balance = gateway.balance().await;
        assert!(balance.is_empty());
        // Budget of 3 retries means exactly 4 attempts; the queued success
        // is never reached.
        assert_eq!(session.balance_calls(), 4);
        assert!(matches!(gateway.last_error(), Some(SessionError::Timeout)));
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let session = ScriptedSession::new().with_ticker_results(vec![Err(SessionError::Api {
            code: 10002,
            message: "bad request".into(),
        })]);
        let (gateway, _) = gateway(session.clone());

        assert!(gateway.ticker("BTCUSDT").await.is_none());
        assert_eq!(session.ticker_calls(), 1);
    }

    #[tokio::test]
    async fn fatal_auth_error_drops_session_and_reconnects_fresh() {
        let session = ScriptedSession::new()
            .with_balance_results(vec![Err(SessionError::Auth("key revoked".into())), Ok(vec![])]);
        let (gateway, connector) = gateway(session);

        assert!(!gateway.test_connection().await);
        assert_eq!(gateway.state(), ConnectionState::Disconnected);
        assert!(matches!(gateway.last_error(), Some(SessionError::Auth(_))));

        // The next call must establish a fresh session instead of reusing
        // the broken handle.
        assert!(gateway.test_connection().await);
        assert_eq!(gateway.state(), ConnectionState::Connected);
        assert_eq!(connector.connect_count(), 2);
    }

    #[tokio::test]
    async fn connect_failure_is_absorbed() {
        let session = ScriptedSession::new();
        let connector = Arc::new(
            ScriptedConnector::new(session)
                .with_connect_results(vec![Err(SessionError::Auth("bad key".into()))]),
        );
        let gateway = ExchangeGateway::new(connector.clone(), &testkit::config::gateway());

        assert!(!gateway.test_connection().await);
        assert_eq!(gateway.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn success_clears_last_error() {
        let session = ScriptedSession::new().with_balance_results(vec![
            Err(SessionError::Api {
                code: 1,
                message: "oops".into(),
            }),
            Ok(vec![]),
        ]);
        let (gateway, _) = gateway(session);

        assert!(!gateway.test_connection().await);
        assert!(gateway.last_error().is_some());

        assert!(gateway.test_connection().await);
        assert!(gateway.last_error().is_none());
    }
}
