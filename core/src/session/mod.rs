//! Netplay session management
//!
//! Provides [`Session`], which owns the rollback engine, the transport and
//! the actor registry, and routes engine events to the host simulation.

mod builder;
mod dispatch;
mod session;
mod types;


// Re-export public types
pub use dispatch::{DispatchStats, EventDispatcher};
pub use session::Session;
pub use types::{ActorError, InitError, InputError, SessionObserver, SessionState};
