//! Shared test utilities for integration and unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::actor::{ActorHandle, ActorType};
use crate::config::SessionConfig;
use crate::engine::{
    AdvanceEvent, EngineError, Frame, GameEvent, LoadEvent, RollbackEngine, SaveEvent,
    SessionEvent,
};
use crate::simulation::{SavedState, Simulation, SimulationError};
use crate::transport::{Datagram, NetAdapter};

/// Small config that binds an ephemeral port
pub fn test_config() -> SessionConfig {
    SessionConfig::new(2, 16, 256).with_port(0)
}

// ============================================================================
// Scripted Engine
// ============================================================================

/// One game event the scripted engine will hand out, with its backing storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    Save {
        frame: Frame,
        buf: Vec<u8>,
        len: usize,
        checksum: u32,
    },
    Load {
        frame: Frame,
        data: Vec<u8>,
    },
    Advance {
        frame: Frame,
        input: Vec<u8>,
        rolling_back: bool,
    },
    Empty,
}

impl Scripted {
    /// Save request whose lent buffer is exactly `requested` bytes
    pub fn save(frame: Frame, requested: usize) -> Self {
        Self::Save {
            frame,
            buf: vec![0; requested],
            len: requested,
            checksum: 0,
        }
    }

    pub fn load(frame: Frame, data: &[u8]) -> Self {
        Self::Load {
            frame,
            data: data.to_vec(),
        }
    }

    pub fn advance(frame: Frame, input: &[u8]) -> Self {
        Self::Advance {
            frame,
            input: input.to_vec(),
            rolling_back: false,
        }
    }

    pub fn resimulate(frame: Frame, input: &[u8]) -> Self {
        Self::Advance {
            frame,
            input: input.to_vec(),
            rolling_back: true,
        }
    }

    fn as_event(&mut self) -> GameEvent<'_> {
        match self {
            Self::Save {
                frame,
                buf,
                len,
                checksum,
            } => GameEvent::Save(SaveEvent {
                frame: *frame,
                state: buf.as_mut_slice(),
                state_len: len,
                checksum,
            }),
            Self::Load { frame, data } => GameEvent::Load(LoadEvent {
                frame: *frame,
                state: data.as_slice(),
            }),
            Self::Advance {
                frame,
                input,
                rolling_back,
            } => GameEvent::Advance(AdvanceEvent {
                frame: *frame,
                inputs: input.as_slice(),
                rolling_back: *rolling_back,
            }),
            Self::Empty => GameEvent::Empty,
        }
    }
}

/// Engine double that records every call and replays scripted events
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    pub started_with: Option<SessionConfig>,
    pub fail_start: bool,
    pub reject_actors: bool,
    pub actors: Vec<(ActorType, Option<String>)>,
    pub delays: Vec<(ActorHandle, u8)>,
    pub local_inputs: Vec<(ActorHandle, Vec<u8>)>,
    pub polls: usize,
    /// Registered actor count at the moment each `network_poll` ran
    pub actors_at_poll: Vec<usize>,
    /// Every datagram the engine read through its adapter
    pub received: Vec<Datagram>,
    /// Packets to send on the next `network_poll`
    pub outgoing: Vec<(String, Vec<u8>)>,
    /// Drained by the next `session_events`
    pub pending_events: Vec<SessionEvent>,
    /// One entry per tick; ticks past the end yield nothing
    pub script: VecDeque<Vec<Scripted>>,
    /// Events handed out on the last tick, with whatever the session wrote back
    pub issued: Vec<Scripted>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory closure for `Session::init`
    pub fn factory() -> impl FnOnce() -> Result<Self, EngineError> {
        || Ok(Self::new())
    }

    pub fn queue_tick(&mut self, events: Vec<Scripted>) {
        self.script.push_back(events);
    }

    pub fn actor_addrs(&self, actor: ActorType) -> Vec<&str> {
        self.actors
            .iter()
            .filter(|(kind, _)| *kind == actor)
            .filter_map(|(_, addr)| addr.as_deref())
            .collect()
    }
}

impl RollbackEngine for ScriptedEngine {
    fn start(&mut self, config: &SessionConfig) -> Result<(), EngineError> {
        if self.fail_start {
            return Err(EngineError::Start("scripted failure".into()));
        }
        self.started_with = Some(config.clone());
        Ok(())
    }

    fn add_actor(
        &mut self,
        actor: ActorType,
        addr: Option<&str>,
    ) -> Result<ActorHandle, EngineError> {
        if self.reject_actors {
            return Err(EngineError::ActorRejected {
                actor,
                reason: "scripted rejection".into(),
            });
        }
        let handle = ActorHandle::new(self.actors.len() as u32);
        self.actors.push((actor, addr.map(str::to_owned)));
        Ok(handle)
    }

    fn set_local_delay(&mut self, handle: ActorHandle, frames: u8) {
        self.delays.push((handle, frames));
    }

    fn add_local_input(&mut self, handle: ActorHandle, input: &[u8]) {
        self.local_inputs.push((handle, input.to_vec()));
    }

    fn network_poll(&mut self, net: &mut dyn NetAdapter) {
        self.polls += 1;
        self.actors_at_poll.push(self.actors.len());
        for (addr, payload) in self.outgoing.drain(..) {
            net.send(&addr, &payload);
        }
        self.received.extend(net.receive_all().iter().cloned());
    }

    fn session_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn update_session(&mut self) -> Vec<GameEvent<'_>> {
        self.issued = self.script.pop_front().unwrap_or_default();
        self.issued.iter_mut().map(Scripted::as_event).collect()
    }
}

// ============================================================================
// Recording Simulation
// ============================================================================

/// Simulation double: saves a fixed blob and records every call
#[derive(Debug, Default)]
pub struct RecordingSimulation {
    /// Bytes written by `save_state`
    pub state: Vec<u8>,
    pub save_capacities: Vec<usize>,
    pub loads: Vec<Vec<u8>>,
    pub frames: Vec<Vec<u8>>,
    /// Call order: "save", "load", "run"
    pub calls: Vec<&'static str>,
    pub fail_save: bool,
    pub fail_load: bool,
    /// Report one byte more than the capacity offered
    pub overreport_save: bool,
}

impl RecordingSimulation {
    pub fn with_state(state: Vec<u8>) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }
}

impl Simulation for RecordingSimulation {
    fn save_state(&mut self, dst: &mut [u8]) -> Result<SavedState, SimulationError> {
        self.calls.push("save");
        self.save_capacities.push(dst.len());

        if self.fail_save {
            return Err(SimulationError::Serialize("scripted failure".into()));
        }
        if self.overreport_save {
            return Ok(SavedState {
                len: dst.len() + 1,
                checksum: 0,
            });
        }
        if self.state.len() > dst.len() {
            return Err(SimulationError::StateTooLarge {
                size: self.state.len(),
                capacity: dst.len(),
            });
        }

        let len = self.state.len();
        dst[..len].copy_from_slice(&self.state);
        Ok(SavedState::of(&dst[..len]))
    }

    fn load_state(&mut self, src: &[u8]) -> Result<(), SimulationError> {
        self.calls.push("load");
        if self.fail_load {
            return Err(SimulationError::Deserialize("scripted failure".into()));
        }
        self.loads.push(src.to_vec());
        Ok(())
    }

    fn run_frame(&mut self, input: &[u8]) {
        self.calls.push("run");
        self.frames.push(input.to_vec());
    }
}

// ============================================================================
// In-Memory Adapter
// ============================================================================

#[derive(Debug, Default)]
struct MemoryNetState {
    inbound: Vec<Datagram>,
    sent: Vec<(String, Vec<u8>)>,
}

/// Test-side handle onto a [`MemoryAdapter`] owned by a session
#[derive(Debug, Clone, Default)]
pub struct MemoryNet(Rc<RefCell<MemoryNetState>>);

impl MemoryNet {
    /// Queue a datagram for the adapter's next `receive_all`
    pub fn push_inbound(&self, addr: &str, payload: &[u8]) {
        self.0
            .borrow_mut()
            .inbound
            .push(Datagram::new(addr, payload.to_vec()));
    }

    /// Everything sent through the adapter so far
    pub fn sent(&self) -> Vec<(String, Vec<u8>)> {
        self.0.borrow().sent.clone()
    }
}

/// Deterministic [`NetAdapter`] backed by queues instead of a socket
#[derive(Debug)]
pub struct MemoryAdapter {
    net: MemoryNet,
    batch: Vec<Datagram>,
}

impl MemoryAdapter {
    pub fn new() -> (Self, MemoryNet) {
        let net = MemoryNet::default();
        let adapter = Self {
            net: net.clone(),
            batch: Vec::new(),
        };
        (adapter, net)
    }
}

impl NetAdapter for MemoryAdapter {
    fn send(&mut self, addr: &str, payload: &[u8]) {
        self.net
            .0
            .borrow_mut()
            .sent
            .push((addr.to_owned(), payload.to_vec()));
    }

    fn receive_all(&mut self) -> &[Datagram] {
        self.batch = std::mem::take(&mut self.net.0.borrow_mut().inbound);
        &self.batch
    }

    fn received(&self) -> &[Datagram] {
        &self.batch
    }
}
