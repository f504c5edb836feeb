//! Auto-discovery of remote players from inbound traffic
//!
//! The session drains the adapter itself before the engine polls, picks out
//! senders the registry has never seen, registers them, and only then lets
//! the engine read the same batch through [`PrimedAdapter`]. The engine
//! therefore never sees a packet from a peer it does not know.

use smallvec::SmallVec;

use super::adapter::{Datagram, NetAdapter};
use crate::registry::ActorRegistry;

/// Newly seen sender addresses from one receive cycle
pub type Newcomers = SmallVec<[String; 4]>;

/// Unknown sender addresses in arrival order, deduplicated, at most `slots`
pub fn discover_senders(
    received: &[Datagram],
    registry: &ActorRegistry,
    slots: usize,
) -> Newcomers {
    let mut newcomers = Newcomers::new();

    for datagram in received {
        if newcomers.len() >= slots {
            break;
        }
        let addr = datagram.address();
        if registry.is_known(addr) || newcomers.iter().any(|seen| seen == addr) {
            continue;
        }
        newcomers.push(addr.to_owned());
    }

    newcomers
}

/// Adapter wrapper whose first `receive_all` replays the batch already drained
pub struct PrimedAdapter<'a> {
    inner: &'a mut dyn NetAdapter,
    primed: bool,
}

impl<'a> PrimedAdapter<'a> {
    pub fn new(inner: &'a mut dyn NetAdapter) -> Self {
        Self {
            inner,
            primed: true,
        }
    }
}

impl NetAdapter for PrimedAdapter<'_> {
    fn send(&mut self, addr: &str, payload: &[u8]) {
        self.inner.send(addr, payload);
    }

    fn receive_all(&mut self) -> &[Datagram] {
        if std::mem::take(&mut self.primed) {
            self.inner.received()
        } else {
            self.inner.receive_all()
        }
    }

    fn received(&self) -> &[Datagram] {
        self.inner.received()
    }
}
