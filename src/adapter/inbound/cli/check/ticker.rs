use crate::config::Config;
use crate::error::Result;

use super::build_gateway;

/// Fetch and display a symbol's ticker.
///
/// Falls back to the configured default symbol when none is given.
pub async fn execute(config: &Config, symbol: Option<String>) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| config.exchange.default_symbol.clone());
    let gateway = build_gateway(config)?;

    println!("Fetching {symbol} ticker from {}...", gateway.exchange_name());
    match gateway.ticker(&symbol).await {
        Some(ticker) => {
            println!("{}: {}", ticker.symbol, ticker.last_price);
            println!("  24h change: {}%", ticker.percent_change_24h);
        }
        None => match gateway.last_error() {
            Some(err) => println!("No ticker for {symbol}: {err}"),
            None => println!("No ticker for {symbol}."),
        },
    }
    Ok(())
}
