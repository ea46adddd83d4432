use crate::config::Config;
use crate::error::Result;

use super::build_gateway;

/// List tradable symbols, up to `limit`.
pub async fn execute(config: &Config, limit: usize) -> Result<()> {
    let gateway = build_gateway(config)?;

    println!("Fetching symbols from {}...", gateway.exchange_name());
    let symbols = gateway.available_symbols().await;

    if symbols.is_empty() {
        match gateway.last_error() {
            Some(err) => println!("Symbol list unavailable: {err}"),
            None => println!("No tradable symbols reported."),
        }
        return Ok(());
    }

    println!("Found {} symbols (showing first {}):", symbols.len(), limit.min(symbols.len()));
    for symbol in symbols.iter().take(limit) {
        println!("  {symbol}");
    }
    Ok(())
}
