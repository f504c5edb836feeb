//! Non-blocking UDP implementation of [`NetAdapter`]

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

use super::adapter::{Datagram, NetAdapter};
use super::address::{AddressError, parse_address};
use super::error::TransportError;

/// Largest datagram read in one piece; longer packets are truncated by the OS
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// Result records allocated on the first non-empty receive; doubled when full
pub const INITIAL_RESULT_CAPACITY: usize = 8;

/// Payload of the one-shot datagram sent by [`UdpTransport::send_probe`]
pub const PROBE_PAYLOAD: &[u8] = b"NETPLAY-PROBE";

/// UDP socket bound to a local port, used as the session's packet channel
pub struct UdpTransport {
    socket: UdpSocket,
    local_addr: SocketAddr,
    /// Reusable record pool; only `..count` is valid
    results: Vec<Datagram>,
    count: usize,
    recv_buf: Vec<u8>,
}

impl UdpTransport {
    /// Bind `0.0.0.0:port` (port 0 picks an ephemeral port) in non-blocking mode
    pub fn bind(port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))
            .map_err(|source| TransportError::Bind { port, source })?;

        socket
            .set_nonblocking(true)
            .map_err(TransportError::NonBlocking)?;

        let local_addr = socket.local_addr().map_err(TransportError::LocalAddr)?;

        tracing::info!(port = local_addr.port(), "UDP transport bound");

        Ok(Self {
            socket,
            local_addr,
            results: Vec::new(),
            count: 0,
            recv_buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Bound port (useful after binding port 0)
    pub fn local_port(&self) -> u16 {
        self.local_addr.port()
    }

    /// Number of result records currently allocated
    pub fn pool_capacity(&self) -> usize {
        self.results.capacity()
    }

    /// Fire a single probe datagram at `addr`.
    ///
    /// Lets a peer see traffic from us (and auto-discover us) before the
    /// engine has anything to send.
    pub fn send_probe(&mut self, addr: &str) -> Result<(), AddressError> {
        let target = parse_address(addr)?;
        tracing::debug!(%target, "Sending probe");
        self.send_raw(target.into(), PROBE_PAYLOAD);
        Ok(())
    }

    fn send_raw(&self, target: SocketAddr, payload: &[u8]) {
        if let Err(e) = self.socket.send_to(payload, target) {
            // WouldBlock is expected for non-blocking sockets when buffer is full
            if e.kind() != io::ErrorKind::WouldBlock {
                tracing::warn!(error = %e, %target, "Failed to send datagram");
            }
        }
    }

    fn push_result(&mut self, from: SocketAddr, len: usize) {
        if self.count == self.results.len() {
            if self.results.len() == self.results.capacity() {
                let additional = self.results.capacity().max(INITIAL_RESULT_CAPACITY);
                self.results.reserve_exact(additional);
            }
            self.results.push(Datagram::default());
        }

        let slot = &mut self.results[self.count];
        slot.addr.clear();
        slot.addr.push_str(&from.to_string());
        slot.payload.clear();
        slot.payload.extend_from_slice(&self.recv_buf[..len]);
        self.count += 1;
    }
}

impl NetAdapter for UdpTransport {
    fn send(&mut self, addr: &str, payload: &[u8]) {
        if payload.is_empty() {
            return;
        }
        let target = match parse_address(addr) {
            Ok(a) => a,
            Err(e) => {
                tracing::debug!(addr, error = %e, "Dropping send to invalid address");
                return;
            }
        };
        self.send_raw(target.into(), payload);
    }

    fn receive_all(&mut self) -> &[Datagram] {
        self.count = 0;

        loop {
            match self.socket.recv_from(&mut self.recv_buf) {
                Ok((0, _)) => continue,
                Ok((len, from)) => self.push_result(from, len),
                Err(e) => {
                    // WouldBlock means no more data available
                    if !matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) {
                        tracing::debug!(error = %e, "Receive error");
                    }
                    break;
                }
            }
        }

        &self.results[..self.count]
    }

    fn received(&self) -> &[Datagram] {
        &self.results[..self.count]
    }
}

impl std::fmt::Debug for UdpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpTransport")
            .field("local_addr", &self.local_addr)
            .field("pending", &self.count)
            .finish()
    }
}
