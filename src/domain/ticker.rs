//! Price ticker snapshot.

use rust_decimal::Decimal;

/// Snapshot of a symbol's latest price and 24-hour change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    /// Trading symbol (e.g., "BTCUSDT").
    pub symbol: String,
    /// Last traded price.
    pub last_price: Decimal,
    /// Price change over the trailing 24 hours, in percent.
    pub percent_change_24h: Decimal,
    /// Exchange-reported snapshot time, milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}
