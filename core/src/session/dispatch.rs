//! Game event dispatch
//!
//! Turns the engine's Save / Load / Advance events into calls on the host
//! [`Simulation`], enforcing what the engine assumes but does not check:
//! saves never get more room than `state_size`, loads wait until a valid
//! snapshot can exist, and every advance runs exactly one frame on an input
//! blob of exactly `input_size` bytes.

use std::collections::TryReserveError;

use crate::engine::{AdvanceEvent, GameEvent, LoadEvent, SaveEvent};
use crate::simulation::Simulation;

/// Counters accumulated over the session's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Successful saves
    pub saves: u64,
    /// Saves aborted because the host failed
    pub failed_saves: u64,
    /// Successful loads
    pub loads: u64,
    /// Loads skipped (not ready, or empty state)
    pub skipped_loads: u64,
    /// Loads the host failed to apply
    pub failed_loads: u64,
    /// Frames run
    pub advances: u64,
    /// Frames run while re-simulating after a load
    pub rollback_frames: u64,
}

/// Per-session dispatcher state
#[derive(Debug)]
pub struct EventDispatcher {
    input_size: usize,
    state_size: usize,
    /// Owned copy of the current frame's input (always `input_size` bytes)
    input_buf: Vec<u8>,
    /// Whether `input_buf` holds this tick's published input
    input_published: bool,
    /// Set by a successful save or any advance; gates loads
    ready_for_state: bool,
    stats: DispatchStats,
}

impl EventDispatcher {
    /// Allocate the zero-filled input buffer
    pub fn new(input_size: usize, state_size: usize) -> Result<Self, TryReserveError> {
        let mut input_buf = Vec::new();
        input_buf.try_reserve_exact(input_size)?;
        input_buf.resize(input_size, 0);

        Ok(Self {
            input_size,
            state_size,
            input_buf,
            input_published: false,
            ready_for_state: false,
            stats: DispatchStats::default(),
        })
    }

    /// Input of the most recent advance this tick, if any
    pub fn current_input(&self) -> Option<&[u8]> {
        self.input_published.then_some(self.input_buf.as_slice())
    }

    pub fn is_ready_for_state(&self) -> bool {
        self.ready_for_state
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Invalidate the published input; called at the start of every tick
    pub fn begin_tick(&mut self) {
        self.input_published = false;
    }

    /// Handle a tick's worth of events in delivery order
    pub fn dispatch<S: Simulation>(&mut self, sim: &mut S, events: Vec<GameEvent<'_>>) {
        if events.is_empty() {
            return;
        }
        tracing::trace!(count = events.len(), "Game events");

        for event in events {
            tracing::trace!(frame = ?event.frame(), "Game event");
            self.handle_event(sim, event);
        }
    }

    /// Handle one event
    pub fn handle_event<S: Simulation>(&mut self, sim: &mut S, event: GameEvent<'_>) {
        match event {
            GameEvent::Save(ev) => self.handle_save(sim, ev),
            GameEvent::Load(ev) => self.handle_load(sim, ev),
            GameEvent::Advance(ev) => self.handle_advance(sim, ev),
            GameEvent::Empty => {}
        }
    }

    fn handle_save<S: Simulation>(&mut self, sim: &mut S, ev: SaveEvent<'_>) {
        let requested = *ev.state_len;
        // Never offer the host more room than state_size (or than the engine lent)
        let capacity = requested.min(self.state_size).min(ev.state.len());
        *ev.state_len = capacity;

        tracing::trace!(frame = ev.frame, requested, capacity, "Save begin");

        match sim.save_state(&mut ev.state[..capacity]) {
            Ok(saved) if saved.len <= capacity => {
                *ev.state_len = saved.len;
                *ev.checksum = saved.checksum;
                self.ready_for_state = true;
                self.stats.saves += 1;
                tracing::debug!(
                    frame = ev.frame,
                    len = saved.len,
                    checksum = saved.checksum,
                    "Saved state"
                );
            }
            Ok(saved) => {
                self.stats.failed_saves += 1;
                tracing::warn!(
                    frame = ev.frame,
                    len = saved.len,
                    capacity,
                    "save_state reported more bytes than it was given"
                );
            }
            Err(e) => {
                self.stats.failed_saves += 1;
                tracing::warn!(frame = ev.frame, error = %e, "save_state callback failed");
            }
        }
    }

    fn handle_load<S: Simulation>(&mut self, sim: &mut S, ev: LoadEvent<'_>) {
        if !self.ready_for_state {
            self.stats.skipped_loads += 1;
            tracing::warn!(frame = ev.frame, "load_state skipped (not ready)");
            return;
        }
        if ev.state.is_empty() {
            self.stats.skipped_loads += 1;
            tracing::debug!(frame = ev.frame, "load_state skipped (empty state)");
            return;
        }

        // Exact engine length: the engine produced this snapshot
        match sim.load_state(ev.state) {
            Ok(()) => {
                self.stats.loads += 1;
                tracing::debug!(frame = ev.frame, len = ev.state.len(), "Loaded state");
            }
            Err(e) => {
                self.stats.failed_loads += 1;
                tracing::warn!(
                    frame = ev.frame,
                    len = ev.state.len(),
                    error = %e,
                    "load_state callback failed"
                );
            }
        }
    }

    fn handle_advance<S: Simulation>(&mut self, sim: &mut S, ev: AdvanceEvent<'_>) {
        // Only a released dispatcher has no buffer; an empty input is zero-filled
        if self.input_buf.is_empty() {
            tracing::debug!(frame = ev.frame, "Advance skipped (session released)");
            return;
        }

        if ev.inputs.len() < self.input_size {
            tracing::warn!(
                got = ev.inputs.len(),
                expected = self.input_size,
                "Input blob size mismatch"
            );
            self.input_buf.fill(0);
            self.input_buf[..ev.inputs.len()].copy_from_slice(ev.inputs);
        } else {
            self.input_buf.copy_from_slice(&ev.inputs[..self.input_size]);
        }

        self.input_published = true;
        self.stats.advances += 1;
        if ev.rolling_back {
            self.stats.rollback_frames += 1;
        }

        tracing::trace!(
            frame = ev.frame,
            len = ev.inputs.len(),
            rolling_back = ev.rolling_back,
            "Advance"
        );

        sim.run_frame(&self.input_buf);

        // A just-advanced frame is always a valid save point
        self.ready_for_state = true;
    }

    /// Free the input buffer and reset readiness (session teardown)
    pub fn release(&mut self) {
        self.input_buf = Vec::new();
        self.input_published = false;
        self.ready_for_state = false;
    }
}
