//! Netplay Core - rollback netplay session adapter
//!
//! This crate connects an external rollback engine to a deterministic,
//! frame-stepped simulation over UDP. The host registers players, pushes its
//! local input every frame and calls [`Session::poll_once`]; the session
//! exchanges packets, discovers peers and turns the engine's Save / Load /
//! Advance events into calls on the host [`Simulation`].
//!
//! # Architecture
//!
//! - [`UdpTransport`] / [`NetAdapter`] - Non-blocking packet channel handed to the engine
//! - [`ActorRegistry`] - Addresses of known peers (drives auto-discovery)
//! - [`Session`] - Lifecycle, actor registration and the per-frame tick
//! - [`EventDispatcher`] - Save / Load / Advance handling with size and readiness guards
//! - [`RollbackEngine`] / [`Simulation`] - Capabilities supplied by the caller

pub mod actor;
pub mod config;
pub mod engine;
#[cfg(test)]
mod integration;
pub mod registry;
pub mod session;
pub mod simulation;
#[cfg(test)]
pub mod test_utils;
pub mod transport;

// Re-export core traits and types
pub use actor::{ActorHandle, ActorType};
pub use config::{ConfigError, MAX_PLAYERS, SessionConfig};
pub use engine::{
    AdvanceEvent, EngineError, Frame, GameEvent, LoadEvent, RollbackEngine, SaveEvent,
    SessionEvent,
};
pub use registry::ActorRegistry;
pub use session::{
    ActorError, DispatchStats, EventDispatcher, InitError, InputError, Session, SessionObserver,
    SessionState,
};
pub use simulation::{SavedState, Simulation, SimulationError, state_checksum};
pub use transport::{
    AddressError, Datagram, NetAdapter, PROBE_PAYLOAD, TransportError, UdpTransport,
    parse_address,
};
