//! Host simulation capability
//!
//! The host (emulator core or game) exposes serialize, deserialize and
//! run-one-frame. The dispatcher calls these in the order the engine asks for.

/// Result of a successful [`Simulation::save_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedState {
    /// Bytes written into the destination buffer
    pub len: usize,
    /// Checksum of the written bytes, used by the engine for desync detection
    pub checksum: u32,
}

impl SavedState {
    /// Describe `data` (already written) with a [`state_checksum`]
    pub fn of(data: &[u8]) -> Self {
        Self {
            len: data.len(),
            checksum: state_checksum(data),
        }
    }
}

/// Deterministic, frame-stepped state being synchronized
pub trait Simulation {
    /// Serialize into `dst`; `dst.len()` is the capacity the host may use
    fn save_state(&mut self, dst: &mut [u8]) -> Result<SavedState, SimulationError>;

    /// Restore from a snapshot produced by `save_state`
    fn load_state(&mut self, src: &[u8]) -> Result<(), SimulationError>;

    /// Run exactly one frame with the given input blob
    fn run_frame(&mut self, input: &[u8]);
}

/// Error from a host save or load
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The serialized state does not fit the capacity offered
    #[error("state too large: {size} bytes (max {capacity})")]
    StateTooLarge { size: usize, capacity: usize },
    /// Host serializer failed
    #[error("serialize failed: {0}")]
    Serialize(String),
    /// Host deserializer failed
    #[error("deserialize failed: {0}")]
    Deserialize(String),
}

/// xxHash3 checksum of a state snapshot, truncated to the engine's 32-bit field
pub fn state_checksum(data: &[u8]) -> u32 {
    xxhash_rust::xxh3::xxh3_64(data) as u32
}
