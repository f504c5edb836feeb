//! Known actor addresses
//!
//! The registry answers "have we already registered this `host:port`?" for
//! auto-discovery. Entries keep insertion order so diagnostics list peers in
//! the order they joined.

use hashbrown::HashSet;

/// Deduplicated, insertion-ordered set of actor addresses
#[derive(Debug, Default, Clone)]
pub struct ActorRegistry {
    addrs: Vec<String>,
    index: HashSet<String>,
}

impl ActorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an address has been registered
    pub fn is_known(&self, addr: &str) -> bool {
        self.index.contains(addr)
    }

    /// Insert an address; re-adding a known address is a no-op.
    ///
    /// Returns `true` if the address was new.
    pub fn remember(&mut self, addr: &str) -> bool {
        if self.index.contains(addr) {
            return false;
        }
        self.index.insert(addr.to_owned());
        self.addrs.push(addr.to_owned());
        true
    }

    /// Number of known addresses
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Addresses in registration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addrs.iter().map(String::as_str)
    }

    /// Forget every address and release storage
    pub fn clear(&mut self) {
        self.addrs = Vec::new();
        self.index = HashSet::new();
    }
}
