//! Simulation controller
//!
//! [`Simulation`] owns one [`SimulationState`] plus its dice and is the
//! boundary the presentation layer talks to: start/stop/reset, interval
//! changes, frame callbacks, reads, and turn notifications.

use serde::{Deserialize, Serialize};

use super::dice::{DiceSource, SeededDice};
use super::scheduler::{Cadence, FrameRequest, SchedulerPhase, TurnScheduler, validate_interval};
use super::state::{InitialPlacement, SimulationState};
use super::turn::{TurnResult, advance_turn};
use crate::error::SimResult;
use crate::settings::Settings;
use crate::stats::VisitSnapshot;

/// Handle for removing a turn listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Passed to listeners so they can halt the simulation mid-frame
#[derive(Debug, Default)]
pub struct TurnControl {
    stop_requested: bool,
}

impl TurnControl {
    /// Stop the scheduler once listeners have run; no further turn fires
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

/// Callback fired after every completed turn
pub type TurnListener = Box<dyn FnMut(&TurnResult, &mut TurnControl)>;

/// Result of handling one host frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// The turn that fired on this frame, if one was due
    pub turn: Option<TurnResult>,
    /// Whether the host should call back on the next frame
    pub next: FrameRequest,
}

/// Consistent read of everything presentation needs for one redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub position: usize,
    pub visits: VisitSnapshot,
    pub last_turn: Option<TurnResult>,
    pub running: bool,
}

/// A single board-walk simulation
pub struct Simulation<D: DiceSource = SeededDice> {
    state: SimulationState,
    dice: D,
    scheduler: TurnScheduler,
    listeners: Vec<(ListenerId, TurnListener)>,
    next_listener_id: u64,
    last_turn: Option<TurnResult>,
}

impl Simulation<SeededDice> {
    /// Build a simulation from settings (seeded dice, or entropy if no seed)
    pub fn from_settings(settings: &Settings) -> SimResult<Self> {
        settings.validate()?;
        let dice = match settings.seed {
            Some(seed) => SeededDice::new(seed),
            None => SeededDice::from_entropy(),
        };
        log::info!(
            "Simulation configured: seed {}, {} ms/turn, {} cadence",
            dice.seed(),
            settings.effective_interval_ms(),
            settings.cadence.as_str()
        );
        Self::with_config(
            dice,
            settings.effective_interval_ms(),
            settings.initial_placement,
            settings.cadence,
        )
    }
}

impl<D: DiceSource> Simulation<D> {
    /// Default interval, uncounted start square, drift-accepting cadence
    pub fn new(dice: D) -> Self {
        let state = SimulationState::default();
        Self::from_parts(state, dice, TurnScheduler::default())
    }

    pub fn with_config(
        dice: D,
        turn_interval_ms: f64,
        initial_placement: InitialPlacement,
        cadence: Cadence,
    ) -> SimResult<Self> {
        let interval = validate_interval(turn_interval_ms)?;
        let state = SimulationState::new(interval, initial_placement);
        Ok(Self::from_parts(state, dice, TurnScheduler::new(cadence)))
    }

    fn from_parts(state: SimulationState, dice: D, scheduler: TurnScheduler) -> Self {
        Self {
            state,
            dice,
            scheduler,
            listeners: Vec::new(),
            next_listener_id: 0,
            last_turn: None,
        }
    }

    // ── Control ───────────────────────────────────

    /// Begin advancing turns. Returns `Request` only when the host should
    /// start its frame loop (a second `start` is a no-op).
    pub fn start(&mut self, now: f64) -> FrameRequest {
        let request = self.scheduler.start(&mut self.state, now);
        if request.is_request() {
            log::info!("Simulation started at {:.1} ms", now);
        }
        request
    }

    /// Stop advancing turns; position and visits are kept
    pub fn stop(&mut self) {
        if self.scheduler.stop(&mut self.state) {
            log::info!("Simulation stopped after {} turns", self.state.turns_taken);
        }
    }

    /// Stop, put the token on space 0 and clear visits. The interval is kept.
    pub fn reset(&mut self) {
        self.stop();
        self.state.clear_board();
        self.last_turn = None;
        log::info!("Simulation reset");
    }

    /// Change the time between turns. Rejected values leave the interval as is.
    pub fn set_interval(&mut self, ms: f64) -> SimResult<()> {
        match self.scheduler.set_interval(&mut self.state, ms) {
            Ok(()) => {
                log::info!("Turn interval set to {} ms", ms);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}", e);
                Err(e)
            }
        }
    }

    /// Move the token without counting a visit
    pub fn place_token(&mut self, space: usize) -> SimResult<()> {
        self.state.place_token(space)
    }

    // ── Host loop ─────────────────────────────────

    /// Handle one host frame at timestamp `ts` (ms, monotonic)
    pub fn on_frame(&mut self, ts: f64) -> FrameOutcome {
        let turn = if self.scheduler.turn_due(&self.state, ts) {
            let turn = advance_turn(&mut self.state, &mut self.dice);
            self.scheduler.mark_turn(&mut self.state, ts);
            self.complete_turn(turn);
            Some(turn)
        } else {
            None
        };

        FrameOutcome {
            turn,
            next: self.scheduler.next_frame(&self.state),
        }
    }

    /// Take one turn immediately, outside the scheduler
    pub fn step(&mut self) -> TurnResult {
        let turn = advance_turn(&mut self.state, &mut self.dice);
        self.complete_turn(turn);
        turn
    }

    fn complete_turn(&mut self, turn: TurnResult) {
        self.last_turn = Some(turn);

        let mut control = TurnControl::default();
        for (_, listener) in &mut self.listeners {
            listener(&turn, &mut control);
        }
        if control.stop_requested() {
            self.stop();
        }
    }

    // ── Notifications ─────────────────────────────

    /// Register a callback fired after every turn
    pub fn on_turn_completed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&TurnResult, &mut TurnControl) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister a callback. Returns false if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ── Reads ─────────────────────────────────────

    pub fn position(&self) -> usize {
        self.state.position()
    }

    /// Detached copy of the visit counts
    pub fn snapshot(&self) -> VisitSnapshot {
        VisitSnapshot::from(*self.state.visit_counts())
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            position: self.state.position(),
            visits: self.snapshot(),
            last_turn: self.last_turn,
            running: self.state.is_running(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase(&self.state)
    }

    pub fn cadence(&self) -> Cadence {
        self.scheduler.cadence()
    }

    pub fn turn_interval_ms(&self) -> f64 {
        self.state.turn_interval_ms()
    }

    pub fn turns_taken(&self) -> u64 {
        self.state.turns_taken()
    }

    pub fn last_turn(&self) -> Option<TurnResult> {
        self.last_turn
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn dice(&self) -> &D {
        &self.dice
    }
}
