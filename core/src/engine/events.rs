//! Events emitted by the rollback engine each tick
//!
//! Game events borrow engine-owned buffers: a save event lends the snapshot
//! slot to be filled, load and advance events lend the bytes to consume. The
//! borrows end when the tick's event list is dropped.

use crate::actor::ActorHandle;

/// Frame number as counted by the engine
pub type Frame = i32;

/// Request to snapshot the simulation into an engine-owned slot
#[derive(Debug)]
pub struct SaveEvent<'a> {
    /// Frame being saved
    pub frame: Frame,
    /// Snapshot slot lent by the engine
    pub state: &'a mut [u8],
    /// In: length the engine asks for. Out: bytes actually written.
    pub state_len: &'a mut usize,
    /// Out: checksum of the written state
    pub checksum: &'a mut u32,
}

/// Request to restore a previously saved snapshot
#[derive(Debug)]
pub struct LoadEvent<'a> {
    /// Frame being restored
    pub frame: Frame,
    /// Snapshot bytes (exact length produced by the matching save)
    pub state: &'a [u8],
}

/// Request to run exactly one simulation frame
#[derive(Debug)]
pub struct AdvanceEvent<'a> {
    /// Frame being advanced to
    pub frame: Frame,
    /// Authoritative (or predicted) input blob for the frame
    pub inputs: &'a [u8],
    /// Whether this advance re-simulates history after a load
    pub rolling_back: bool,
}

/// One game event, processed strictly in delivery order
#[derive(Debug)]
pub enum GameEvent<'a> {
    Save(SaveEvent<'a>),
    Load(LoadEvent<'a>),
    Advance(AdvanceEvent<'a>),
    /// Placeholder slot with nothing to do
    Empty,
}

impl GameEvent<'_> {
    /// Frame number carried by the event, if any
    pub fn frame(&self) -> Option<Frame> {
        match self {
            Self::Save(e) => Some(e.frame),
            Self::Load(e) => Some(e.frame),
            Self::Advance(e) => Some(e.frame),
            Self::Empty => None,
        }
    }
}

/// Session-level notifications, forwarded verbatim to the host's observer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Handshake progress with a peer
    PlayerSyncing {
        handle: ActorHandle,
        current: u8,
        max: u8,
    },
    /// A peer finished synchronizing
    PlayerConnected { handle: ActorHandle },
    /// A peer timed out or left
    PlayerDisconnected { handle: ActorHandle },
    /// All players synchronized; frames start advancing
    SessionStarted,
    /// Spectator stream stalled waiting for input
    SpectatorPaused,
    /// Spectator stream resumed
    SpectatorUnpaused,
    /// Checksums for a frame differ between us and a peer
    ///
    /// State has diverged and cannot be recovered; hosts usually end the session.
    DesyncDetected {
        frame: Frame,
        local_checksum: u32,
        remote_checksum: u32,
        remote_handle: ActorHandle,
    },
}
