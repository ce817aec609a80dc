//! Board Walk - a token circling a 40-space board loop
//!
//! Core modules:
//! - `sim`: Simulation engine (dice, state, turn engine, scheduler, controller)
//! - `board`: Board topology and cell geometry for the 11x11 grid
//! - `stats`: Read-only visit statistics
//! - `host`: Clock and frame-loop adapters the host plugs in
//! - `settings`: Data-driven configuration

pub mod board;
pub mod error;
pub mod host;
pub mod settings;
pub mod sim;
pub mod stats;

pub use board::{BoardLayout, GridCell, grid_cell_for_index, index_for_grid_cell};
pub use error::{SimError, SimResult};
pub use settings::{Settings, SpeedPreset};
pub use sim::{
    BoardView, Cadence, DiceSource, FrameOutcome, FrameRequest, InitialPlacement, ListenerId,
    ScriptedDice, SeededDice, Simulation, SimulationState, TurnResult,
};
pub use stats::VisitSnapshot;

/// Board and timing constants
pub mod consts {
    /// Number of spaces on the board ring
    pub const BOARD_SPACES: usize = 40;
    /// Side length of the square grid whose edge cells form the ring
    pub const GRID_SIZE: usize = 11;
    /// Faces on each die
    pub const DIE_FACES: u8 = 6;

    /// Default time between turns (ms)
    pub const DEFAULT_TURN_INTERVAL_MS: f64 = 500.0;
    /// Speed slider bounds (ms per turn)
    pub const MIN_SLIDER_INTERVAL_MS: f64 = 50.0;
    pub const MAX_SLIDER_INTERVAL_MS: f64 = 2000.0;

    /// Fixed-increment cadence resyncs instead of catching up past this many intervals
    pub const MAX_BACKLOG_TURNS: f64 = 8.0;

    /// Default board cell size in pixels (presentation hint)
    pub const DEFAULT_CELL_SIZE: f32 = 54.0;
    /// Token marker size in pixels
    pub const TOKEN_SIZE: f32 = 20.0;
}

/// Advance `steps` spaces around the board ring from `position`
#[inline]
pub fn wrap_space(position: usize, steps: usize) -> usize {
    (position + steps) % consts::BOARD_SPACES
}
