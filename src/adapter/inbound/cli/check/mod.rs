//! Connectivity and account check command handlers.

pub mod balance;
pub mod connection;
pub mod symbols;
pub mod ticker;

use std::sync::Arc;

use clap::Subcommand;

use crate::adapter::outbound::rest::RestConnector;
use crate::config::Config;
use crate::error::Result;
use crate::gateway::{ExchangeGateway, GatewayConfig};

#[derive(Subcommand)]
pub enum CheckCommand {
    /// Verify credentials with a lightweight authenticated call.
    Connection,
    /// Fetch and display held asset balances.
    Balance,
    /// Fetch a symbol's latest price (defaults to the configured symbol).
    Ticker {
        /// Trading symbol, e.g. BTCUSDT.
        symbol: Option<String>,
    },
    /// List tradable symbols.
    Symbols {
        /// Maximum number of symbols to display.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

pub async fn execute(command: CheckCommand, config: &Config) -> Result<()> {
    match command {
        CheckCommand::Connection => connection::execute(config).await,
        CheckCommand::Balance => balance::execute(config).await,
        CheckCommand::Ticker { symbol } => ticker::execute(config, symbol).await,
        CheckCommand::Symbols { limit } => symbols::execute(config, limit).await,
    }
}

/// Build a gateway bound to the configured exchange profile.
pub(crate) fn build_gateway(config: &Config) -> Result<ExchangeGateway> {
    let connector = RestConnector::from_config(config)?;
    Ok(ExchangeGateway::new(
        Arc::new(connector),
        &GatewayConfig::from_config(config),
    ))
}
