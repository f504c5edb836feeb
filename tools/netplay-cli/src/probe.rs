//! Probe command - check that a peer is reachable
//!
//! Sends one probe datagram and waits for any datagram back from the same
//! address. A peer running `netplay listen` answers every new sender with a
//! probe of its own.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use netplay_core::{NetAdapter, UdpTransport, parse_address};

/// Arguments for the probe command
#[derive(Args)]
pub struct ProbeArgs {
    /// Peer address as ip:port (e.g., 10.0.0.2:7000)
    pub address: String,

    /// Local port to send from (0 picks a free port)
    #[arg(long, default_value_t = 0)]
    pub port: u16,

    /// Seconds to wait for a reply
    #[arg(long, default_value_t = 3)]
    pub timeout: u64,
}

/// Execute the probe command
pub fn execute(args: ProbeArgs) -> Result<()> {
    let target = parse_address(&args.address)
        .with_context(|| format!("Invalid peer address '{}'", args.address))?;

    let mut transport = UdpTransport::bind(args.port).context("Failed to bind local port")?;

    println!("=== Probe ===");
    println!("  From: {}", transport.local_addr());
    println!("  To:   {}", target);

    transport.send_probe(&args.address)?;

    let start = Instant::now();
    let timeout = Duration::from_secs(args.timeout);
    let expected = target.to_string();

    while start.elapsed() < timeout {
        if let Some(reply) = transport
            .receive_all()
            .iter()
            .find(|d| d.address() == expected)
        {
            println!(
                "  Reply: {} bytes after {} ms",
                reply.len(),
                start.elapsed().as_millis()
            );
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    anyhow::bail!(
        "No reply from {} within {}s (is `netplay listen` running there?)",
        target,
        args.timeout
    )
}
