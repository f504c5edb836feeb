//! Rollback engine capability
//!
//! The prediction/rollback algorithm lives outside this crate. A session only
//! needs the handful of operations below; anything implementing
//! [`RollbackEngine`] can drive it. Engine creation is the factory closure
//! given to [`Session::init`](crate::Session::init), destruction is `Drop`.

mod events;

pub use events::{AdvanceEvent, Frame, GameEvent, LoadEvent, SaveEvent, SessionEvent};

use crate::actor::{ActorHandle, ActorType};
use crate::config::SessionConfig;
use crate::transport::NetAdapter;

/// Error reported by a rollback engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine could not be constructed
    #[error("engine creation failed: {0}")]
    Create(String),
    /// The engine refused to start with the given config
    #[error("engine start failed: {0}")]
    Start(String),
    /// The engine rejected an actor
    #[error("engine rejected {actor} actor: {reason}")]
    ActorRejected { actor: ActorType, reason: String },
}

/// Operations a session needs from the rollback engine
pub trait RollbackEngine {
    /// Start the session with the full configuration
    fn start(&mut self, config: &SessionConfig) -> Result<(), EngineError>;

    /// Register an actor and return its handle
    fn add_actor(
        &mut self,
        actor: ActorType,
        addr: Option<&str>,
    ) -> Result<ActorHandle, EngineError>;

    /// Set input delay (frames) for a local actor
    fn set_local_delay(&mut self, handle: ActorHandle, frames: u8);

    /// Queue this frame's input blob for a local actor
    fn add_local_input(&mut self, handle: ActorHandle, input: &[u8]);

    /// Exchange protocol packets through `net`
    fn network_poll(&mut self, net: &mut dyn NetAdapter);

    /// Drain pending session-level events
    fn session_events(&mut self) -> Vec<SessionEvent>;

    /// Advance the session and return this tick's game events, in order
    fn update_session(&mut self) -> Vec<GameEvent<'_>>;
}
