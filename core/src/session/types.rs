//! Core types for netplay sessions

use std::collections::TryReserveError;

use crate::actor::ActorType;
use crate::config::ConfigError;
use crate::engine::{EngineError, SessionEvent};
use crate::transport::{NetAdapter, TransportError, UdpTransport};

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle of a [`Session`](super::Session).
///
/// There is no "uninitialized" value: a session only exists once `init`
/// succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Engine and transport live; ticks run
    Active,
    /// `deinit` ran; every operation is a no-op or error
    Destroyed,
}

/// Callback receiving every engine session event
pub type SessionObserver = Box<dyn FnMut(&SessionEvent)>;

// ============================================================================
// Transport Ownership
// ============================================================================

/// Where the session's packet channel came from
pub(super) enum TransportSlot {
    /// Bound by the session; closed on deinit
    Owned(UdpTransport),
    /// Supplied by the caller; handed back on deinit
    External(Box<dyn NetAdapter>),
}

impl TransportSlot {
    pub(super) fn adapter(&mut self) -> &mut dyn NetAdapter {
        match self {
            Self::Owned(udp) => udp,
            Self::External(adapter) => &mut **adapter,
        }
    }

    pub(super) fn local_port(&self) -> Option<u16> {
        match self {
            Self::Owned(udp) => Some(udp.local_port()),
            Self::External(_) => None,
        }
    }
}

/// Everything that exists only while the session is active
pub(super) struct ActiveParts<E> {
    pub(super) engine: E,
    pub(super) transport: TransportSlot,
}

// ============================================================================
// Errors
// ============================================================================

/// Failure to bring a session up. Nothing is left allocated or bound.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("invalid session config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to allocate {size}-byte input buffer")]
    InputBuffer {
        size: usize,
        #[source]
        source: TryReserveError,
    },
    #[error(transparent)]
    Engine(EngineError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure to register an actor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error("session is not active")]
    Inactive,
    #[error("player capacity reached ({capacity} players)")]
    CapacityReached { capacity: u8 },
    #[error("{0} actor requires an address")]
    MissingAddress(ActorType),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Rejected local input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("session is not active")]
    Inactive,
    #[error("input is empty")]
    Empty,
    #[error("input is {got} bytes, session expects {expected}")]
    SizeMismatch { expected: usize, got: usize },
}
