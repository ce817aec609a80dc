//! Host adapters
//!
//! The simulation never reads a clock itself. A host hands it timestamps from
//! a [`Clock`] and keeps calling `on_frame` while it is told to. In the
//! browser that is `performance.now()` plus `requestAnimationFrame`; tests
//! and the native runner use [`ManualClock`] and [`FrameDriver`].

use std::cell::Cell;

use crate::sim::{DiceSource, FrameRequest, Simulation, TurnResult};

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) -> f64 {
        let now = self.now.get() + ms.max(0.0);
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// `performance.now()` in the browser
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}

/// Fixed-rate frame loop standing in for `requestAnimationFrame`
#[derive(Debug)]
pub struct FrameDriver {
    clock: ManualClock,
    frame_ms: f64,
    frames: u64,
    pending: bool,
}

impl FrameDriver {
    /// Driver ticking every `frame_ms` (16.667 for 60 Hz)
    pub fn new(frame_ms: f64) -> Self {
        Self {
            clock: ManualClock::default(),
            frame_ms,
            frames: 0,
            pending: false,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Frames delivered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// True while the simulation still wants frames
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start the simulation at the current clock time. A simulation that was
    /// already running is picked up as is.
    pub fn start<D: DiceSource>(&mut self, sim: &mut Simulation<D>) {
        sim.start(self.clock.now_ms());
        self.pending = sim.is_running();
    }

    /// Deliver one frame if a callback is pending
    pub fn pump<D: DiceSource>(&mut self, sim: &mut Simulation<D>) -> Option<TurnResult> {
        if !self.pending {
            return None;
        }
        let ts = self.clock.advance(self.frame_ms);
        self.frames += 1;
        let outcome = sim.on_frame(ts);
        self.pending = outcome.next == FrameRequest::Request;
        outcome.turn
    }

    /// Deliver up to `frames` frames, stopping early once the loop halts.
    /// Returns the turns that fired.
    pub fn run<D: DiceSource>(&mut self, sim: &mut Simulation<D>, frames: u64) -> Vec<TurnResult> {
        let mut turns = Vec::new();
        for _ in 0..frames {
            if !self.pending {
                break;
            }
            if let Some(turn) = self.pump(sim) {
                turns.push(turn);
            }
        }
        turns
    }
}
