//! Listen command - watch who is sending to a port
//!
//! Every sender not seen before is reported (the same rule sessions use for
//! auto-discovery) and answered with a probe so the sender's `netplay probe`
//! sees a reply.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use netplay_core::config;
use netplay_core::transport::discover_senders;
use netplay_core::{ActorRegistry, NetAdapter, UdpTransport};

/// Arguments for the listen command
#[derive(Args)]
pub struct ListenArgs {
    /// Port to bind (defaults to the port in the per-user netplay.toml)
    #[arg(long)]
    pub port: Option<u16>,

    /// Stop after this many seconds (runs until interrupted if omitted)
    #[arg(long)]
    pub seconds: Option<u64>,

    /// Stop after this many peers were discovered
    #[arg(long)]
    pub max_peers: Option<usize>,
}

/// Execute the listen command
pub fn execute(args: ListenArgs) -> Result<()> {
    let port = args.port.unwrap_or_else(|| config::load().port);
    let mut transport =
        UdpTransport::bind(port).with_context(|| format!("Failed to bind port {}", port))?;
    let mut registry = ActorRegistry::new();
    let mut datagrams = 0usize;

    println!("=== Listen ===");
    println!("  Bound: {}", transport.local_addr());

    let start = Instant::now();
    let deadline = args.seconds.map(Duration::from_secs);
    let max_peers = args.max_peers.unwrap_or(usize::MAX);

    while deadline.is_none_or(|d| start.elapsed() < d) && registry.len() < max_peers {
        let received = transport.receive_all();
        datagrams += received.len();
        for datagram in received {
            tracing::debug!(
                from = datagram.address(),
                len = datagram.len(),
                "Datagram"
            );
        }

        let slots = max_peers.saturating_sub(registry.len());
        let newcomers = discover_senders(transport.received(), &registry, slots);
        for addr in newcomers {
            registry.remember(&addr);
            println!("  Peer {}: {}", registry.len(), addr);
            if let Err(e) = transport.send_probe(&addr) {
                tracing::warn!(addr = %addr, error = %e, "Could not answer peer");
            }
        }

        std::thread::sleep(Duration::from_millis(10));
    }

    println!(
        "  Done: {} peer(s), {} datagram(s) in {:.1}s",
        registry.len(),
        datagrams,
        start.elapsed().as_secs_f32()
    );
    Ok(())
}
