//! Netplay actors (session participants)

use std::fmt;

/// Role of a registered participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
    /// Player whose input comes from this machine
    Local,
    /// Player on a peer, reached through its `host:port` address
    Remote,
    /// Read-only observer; not counted against player capacity
    Spectator,
}

impl ActorType {
    /// Whether this role occupies a player slot
    pub fn is_player(self) -> bool {
        matches!(self, Self::Local | Self::Remote)
    }

    /// Whether this role must be registered with an address
    pub fn needs_address(self) -> bool {
        matches!(self, Self::Remote | Self::Spectator)
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
            Self::Spectator => write!(f, "spectator"),
        }
    }
}

/// Opaque actor handle issued by the rollback engine at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(u32);

impl ActorHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
