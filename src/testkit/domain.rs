//! Builders for domain primitives used across tests.
//!
//! Concise factory functions so tests focus on assertions rather than
//! construction boilerplate.

use rust_decimal::Decimal;

use crate::domain::Ticker;
use crate::port::outbound::session::{AssetTotal, MarketEntry};

/// An exchange-reported asset total.
pub fn total(asset: &str, quantity: Decimal) -> AssetTotal {
    AssetTotal::new(asset, quantity)
}

/// A market list entry.
pub fn market(symbol: &str) -> MarketEntry {
    MarketEntry::new(symbol)
}

/// A plausible ticker for `symbol`.
pub fn ticker(symbol: &str) -> Ticker {
    Ticker {
        symbol: symbol.to_owned(),
        last_price: Decimal::new(64_250, 0),
        percent_change_24h: Decimal::new(135, 2),
        timestamp_ms: 1_700_000_000_000,
    }
}
