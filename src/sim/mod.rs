//! Board-walk simulation module
//!
//! All movement and bookkeeping lives here. This module must stay free of
//! rendering and platform code:
//! - Dice only through `DiceSource`
//! - Time only through host-supplied timestamps
//! - Position is a plain integer 0..40; board geometry is presentation's job

pub mod controller;
pub mod dice;
pub mod scheduler;
pub mod state;
pub mod turn;

pub use controller::{BoardView, FrameOutcome, ListenerId, Simulation, TurnControl, TurnListener};
pub use dice::{DiceSource, ScriptedDice, SeededDice};
pub use scheduler::{Cadence, FrameRequest, SchedulerPhase, TurnScheduler, validate_interval};
pub use state::{InitialPlacement, SimulationState};
pub use turn::{TurnResult, advance_turn};
