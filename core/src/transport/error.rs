//! Error types for transport setup

use std::io;

/// Error creating a [`UdpTransport`](super::UdpTransport)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind the requested port
    #[error("failed to bind UDP port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },
    /// Failed to switch the socket to non-blocking mode
    #[error("failed to set non-blocking: {0}")]
    NonBlocking(#[source] io::Error),
    /// Failed to query the bound address
    #[error("failed to get local addr: {0}")]
    LocalAddr(#[source] io::Error),
}
