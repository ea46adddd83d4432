use crate::config::Config;
use crate::error::{Error, Result, SessionError};

use super::build_gateway;

/// Test the authenticated connection to the configured exchange.
pub async fn execute(config: &Config) -> Result<()> {
    let credentials = config.credentials()?;

    println!("Exchange: {}", config.exchange.profile.name());
    println!("  Environment: {}", environment(credentials.testnet()));
    println!("  Default symbol: {}", config.exchange.default_symbol);
    println!("  API key: {}", credentials.masked_key());
    println!();

    print!("Testing connection... ");
    let gateway = build_gateway(config)?;
    if gateway.test_connection().await {
        println!("✓ OK");
        return Ok(());
    }

    println!("✗ Failed");
    let cause = gateway
        .last_error()
        .unwrap_or_else(|| SessionError::Network("connection test failed".into()));
    println!("  cause: {cause}");
    Err(Error::Session(cause))
}

fn environment(testnet: bool) -> &'static str {
    if testnet {
        "testnet"
    } else {
        "live"
    }
}
