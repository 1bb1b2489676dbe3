//! blackroad - BlackRoad OS command-line client
//!
//! Thin shell over `blackroad-sdk`: agents, the memory journal, and Codex.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blackroad=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("blackroad {}", env!("CARGO_PKG_VERSION"));
        println!("{}", blackroad_sdk::USER_AGENT);
        return Ok(());
    }

    // Load configuration
    let config = config::Config::load()?.with_overrides(cli.api_url, cli.timeout);

    // Execute command
    match cli.command {
        Commands::Agent(cmd) => commands::agent::execute(cmd, &config).await,
        Commands::Memory(cmd) => commands::memory::execute(cmd, &config).await,
        Commands::Codex(cmd) => commands::codex::execute(cmd, &config).await,
        Commands::Version => Ok(()),
    }
}
