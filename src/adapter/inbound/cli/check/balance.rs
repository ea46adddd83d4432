use crate::config::Config;
use crate::error::Result;

use super::build_gateway;

/// Fetch and display held asset balances.
pub async fn execute(config: &Config) -> Result<()> {
    let gateway = build_gateway(config)?;

    println!("Fetching balance from {}...", gateway.exchange_name());
    let balance = gateway.balance().await;

    if balance.is_empty() {
        match gateway.last_error() {
            Some(err) => println!("Balance unavailable: {err}"),
            None => println!("No held assets."),
        }
        return Ok(());
    }

    println!("Held assets:");
    for (asset, quantity) in balance.iter() {
        println!("  {asset}: {quantity}");
    }
    Ok(())
}
