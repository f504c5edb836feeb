//! Netplay session wrapper

use crate::actor::{ActorHandle, ActorType};
use crate::config::SessionConfig;
use crate::engine::{RollbackEngine, SessionEvent};
use crate::registry::ActorRegistry;
use crate::simulation::Simulation;
use crate::transport::{
    AddressError, NetAdapter, PROBE_PAYLOAD, PrimedAdapter, discover_senders, parse_address,
};

use super::dispatch::{DispatchStats, EventDispatcher};
use super::types::{
    ActiveParts, ActorError, InputError, SessionObserver, SessionState, TransportSlot,
};

/// One netplay session: rollback engine, packet transport, actor registry and
/// the dispatcher bridging engine events to the host [`Simulation`].
///
/// Single-threaded; the host drives it by calling [`Session::poll_once`] once
/// per frame.
pub struct Session<E: RollbackEngine, S: Simulation> {
    pub(super) config: SessionConfig,
    /// `None` once deinit ran
    pub(super) active: Option<ActiveParts<E>>,
    pub(super) simulation: S,
    pub(super) dispatcher: EventDispatcher,
    pub(super) registry: ActorRegistry,
    pub(super) observer: Option<SessionObserver>,
    pub(super) local_actors: usize,
    pub(super) remote_actors: usize,
    pub(super) spectators: usize,
}

impl<E: RollbackEngine, S: Simulation> Session<E, S> {
    // ------------------------------------------------------------------------
    // Actors
    // ------------------------------------------------------------------------

    /// Register a participant with the engine.
    ///
    /// Players (local and remote) are limited to `num_players` in total.
    /// Remote players and spectators need an address; successful remote and
    /// spectator registrations are remembered so auto-discovery skips them.
    pub fn add_actor(
        &mut self,
        actor: ActorType,
        addr: Option<&str>,
    ) -> Result<ActorHandle, ActorError> {
        if self.active.is_none() {
            return Err(ActorError::Inactive);
        }

        let addr = addr.filter(|a| !a.is_empty());
        if actor.needs_address() && addr.is_none() {
            return Err(ActorError::MissingAddress(actor));
        }

        let capacity = self.config.num_players;
        if actor.is_player() && self.player_count() >= usize::from(capacity) {
            tracing::warn!(%actor, capacity, "Player capacity reached");
            return Err(ActorError::CapacityReached { capacity });
        }

        let Some(active) = self.active.as_mut() else {
            return Err(ActorError::Inactive);
        };
        let handle = active.engine.add_actor(actor, addr).map_err(|e| {
            tracing::error!(%actor, addr, error = %e, "Engine rejected actor");
            e
        })?;

        match actor {
            ActorType::Local => self.local_actors += 1,
            ActorType::Remote => self.remote_actors += 1,
            ActorType::Spectator => self.spectators += 1,
        }
        if actor.needs_address()
            && let Some(addr) = addr
        {
            self.registry.remember(addr);
        }

        tracing::info!(%handle, %actor, addr, "Added actor");
        Ok(handle)
    }

    /// Input delay in frames for a local actor; ignored when inactive
    pub fn set_local_delay(&mut self, handle: ActorHandle, frames: u8) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.engine.set_local_delay(handle, frames);
        tracing::debug!(%handle, frames, "Set local input delay");
    }

    /// Submit this frame's input blob for a local actor.
    ///
    /// The blob must be exactly `input_size` bytes.
    pub fn push_local_input(
        &mut self,
        handle: ActorHandle,
        input: &[u8],
    ) -> Result<(), InputError> {
        let Some(active) = self.active.as_mut() else {
            return Err(InputError::Inactive);
        };
        if input.is_empty() {
            return Err(InputError::Empty);
        }
        if input.len() != self.config.input_size {
            return Err(InputError::SizeMismatch {
                expected: self.config.input_size,
                got: input.len(),
            });
        }

        active.engine.add_local_input(handle, input);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------------

    /// Run one tick: network exchange, session events, then game events.
    ///
    /// Does nothing unless the session is active.
    pub fn poll_once(&mut self) {
        if self.active.is_none() {
            return;
        }
        self.dispatcher.begin_tick();

        // Drain the transport first so unknown senders are registered before
        // the engine reads their packets
        let free_slots = usize::from(self.config.num_players).saturating_sub(self.player_count());
        let newcomers = match self.active.as_mut() {
            Some(active) => {
                let received = active.transport.adapter().receive_all();
                if self.config.auto_discovery {
                    discover_senders(received, &self.registry, free_slots)
                } else {
                    Default::default()
                }
            }
            None => return,
        };

        for addr in newcomers {
            match self.add_actor(ActorType::Remote, Some(&addr)) {
                Ok(handle) => {
                    tracing::info!(%handle, addr = %addr, "Auto-registered remote player")
                }
                Err(e) => tracing::warn!(addr = %addr, error = %e, "Auto-registration failed"),
            }
        }

        let Some(active) = self.active.as_mut() else {
            return;
        };

        let mut net = PrimedAdapter::new(active.transport.adapter());
        active.engine.network_poll(&mut net);

        for event in active.engine.session_events() {
            log_session_event(&event);
            if let Some(observer) = self.observer.as_mut() {
                observer(&event);
            }
        }

        let events = active.engine.update_session();
        self.dispatcher.dispatch(&mut self.simulation, events);
    }

    // ------------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------------

    /// Tear the session down. Idempotent.
    ///
    /// The engine is dropped, an owned transport is closed and the registry
    /// and input buffer are released. A caller-supplied adapter is returned.
    pub fn deinit(&mut self) -> Option<Box<dyn NetAdapter>> {
        let ActiveParts { engine, transport } = self.active.take()?;
        drop(engine);

        let external = match transport {
            TransportSlot::Owned(udp) => {
                drop(udp);
                None
            }
            TransportSlot::External(adapter) => Some(adapter),
        };

        self.registry.clear();
        self.dispatcher.release();
        self.local_actors = 0;
        self.remote_actors = 0;
        self.spectators = 0;

        tracing::info!("Netplay session closed");
        external
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Active
        } else {
            SessionState::Destroyed
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Input blob of this tick's most recent advance
    pub fn current_input(&self) -> Option<&[u8]> {
        self.dispatcher.current_input()
    }

    /// Whether a valid snapshot can exist (gates loads)
    pub fn is_ready_for_state(&self) -> bool {
        self.dispatcher.is_ready_for_state()
    }

    pub fn local_actor_count(&self) -> usize {
        self.local_actors
    }

    pub fn remote_actor_count(&self) -> usize {
        self.remote_actors
    }

    pub fn spectator_count(&self) -> usize {
        self.spectators
    }

    /// Local plus remote players
    pub fn player_count(&self) -> usize {
        self.local_actors + self.remote_actors
    }

    pub fn registry(&self) -> &ActorRegistry {
        &self.registry
    }

    /// Bound port when the session owns its UDP transport
    pub fn local_port(&self) -> Option<u16> {
        self.active.as_ref()?.transport.local_port()
    }

    pub fn engine(&self) -> Option<&E> {
        self.active.as_ref().map(|a| &a.engine)
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.active.as_mut().map(|a| &mut a.engine)
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn stats(&self) -> &DispatchStats {
        self.dispatcher.stats()
    }

    /// Forward every engine session event to `observer`
    pub fn set_session_observer(&mut self, observer: impl FnMut(&SessionEvent) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn clear_session_observer(&mut self) {
        self.observer = None;
    }

    /// Send one probe datagram so `addr` can auto-discover us.
    ///
    /// No-op when inactive; the address is still validated.
    pub fn send_probe(&mut self, addr: &str) -> Result<(), AddressError> {
        parse_address(addr)?;
        if let Some(active) = self.active.as_mut() {
            match &mut active.transport {
                TransportSlot::Owned(udp) => udp.send_probe(addr)?,
                TransportSlot::External(adapter) => adapter.send(addr, PROBE_PAYLOAD),
            }
        }
        Ok(())
    }
}

impl<E: RollbackEngine, S: Simulation> std::fmt::Debug for Session<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("num_players", &self.config.num_players)
            .field("local_actors", &self.local_actors)
            .field("remote_actors", &self.remote_actors)
            .field("spectators", &self.spectators)
            .field("ready_for_state", &self.is_ready_for_state())
            .finish_non_exhaustive()
    }
}

fn log_session_event(event: &SessionEvent) {
    match event {
        SessionEvent::PlayerSyncing { handle, current, max } => {
            tracing::debug!(%handle, current, max, "Synchronizing with peer");
        }
        SessionEvent::PlayerConnected { handle } => {
            tracing::info!(%handle, "Peer connected");
        }
        SessionEvent::PlayerDisconnected { handle } => {
            tracing::warn!(%handle, "Peer disconnected");
        }
        SessionEvent::SessionStarted => tracing::info!("Session synchronized"),
        SessionEvent::SpectatorPaused => tracing::debug!("Spectator paused"),
        SessionEvent::SpectatorUnpaused => tracing::debug!("Spectator resumed"),
        SessionEvent::DesyncDetected {
            frame,
            local_checksum,
            remote_checksum,
            remote_handle,
        } => {
            tracing::error!(
                frame,
                local_checksum,
                remote_checksum,
                %remote_handle,
                "Desync detected"
            );
        }
    }
}
