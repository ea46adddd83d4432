//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod session;

pub use session::{AssetTotal, ExchangeSession, MarketEntry, SessionConnector};
