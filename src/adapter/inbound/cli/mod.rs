//! Command-line interface.
//!
//! The `check` subcommands replace the ad-hoc manual scripts a trading
//! setup tends to accumulate: one verified path for "are my credentials
//! good", "what do I hold", "what is the price", "what can I trade".

pub mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "gateward", version, about = "Exchange account gateway")]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connectivity and account checks against the configured exchange.
    #[command(subcommand)]
    Check(check::CheckCommand),
}

/// Dispatch a parsed command.
pub async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Check(check) => check::execute(check, config).await,
    }
}
