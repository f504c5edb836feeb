//! The adapter capability handed to the rollback engine

/// One received datagram.
///
/// Records live in the transport's reusable pool; they are only reachable
/// through the slice returned by [`NetAdapter::receive_all`], which borrows
/// the adapter until the next receive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Datagram {
    pub(super) addr: String,
    pub(super) payload: Vec<u8>,
}

impl Datagram {
    /// Build a record from parts (adapters other than the UDP one use this)
    pub fn new(addr: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            addr: addr.into(),
            payload: payload.into(),
        }
    }

    /// Sender address as `ip:port`
    pub fn address(&self) -> &str {
        &self.addr
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Non-blocking, best-effort datagram channel.
///
/// Implementations must never block: `receive_all` drains what is queued and
/// returns, `send` either hands the packet to the OS or drops it.
pub trait NetAdapter {
    /// Send `payload` to an `ip:port` address. Malformed addresses are dropped.
    fn send(&mut self, addr: &str, payload: &[u8]);

    /// Drain every pending datagram.
    ///
    /// The returned records are overwritten by the next call.
    fn receive_all(&mut self) -> &[Datagram];

    /// Datagrams produced by the most recent `receive_all`
    fn received(&self) -> &[Datagram];
}

impl<T: NetAdapter + ?Sized> NetAdapter for Box<T> {
    fn send(&mut self, addr: &str, payload: &[u8]) {
        (**self).send(addr, payload)
    }

    fn receive_all(&mut self) -> &[Datagram] {
        (**self).receive_all()
    }

    fn received(&self) -> &[Datagram] {
        (**self).received()
    }
}
