//! Netplay CLI - connectivity diagnostics for rollback netplay
//!
//! # Commands
//!
//! - `netplay probe` - Send a probe datagram and wait for a reply
//! - `netplay listen` - Bind a port and report every peer that sends to it
//! - `netplay check-config` - Validate a netplay.toml and print the effective values
//!
//! # Usage
//!
//! ```bash
//! # On the host machine
//! netplay listen --port 7000
//!
//! # On the guest machine
//! netplay probe 10.0.0.2:7000
//! ```
//!
//! Set `RUST_LOG=debug` for per-datagram logging.

mod check_config;
mod listen;
mod probe;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Netplay CLI - connectivity diagnostics for rollback netplay
#[derive(Parser)]
#[command(name = "netplay")]
#[command(about = "Connectivity diagnostics for rollback netplay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a probe datagram to a peer and wait for its reply
    Probe(probe::ProbeArgs),

    /// Bind a port and report peers as they are discovered
    Listen(listen::ListenArgs),

    /// Validate a netplay config file
    CheckConfig(check_config::CheckConfigArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe(args) => probe::execute(args),
        Commands::Listen(args) => listen::execute(args),
        Commands::CheckConfig(args) => check_config::execute(args),
    }
}
