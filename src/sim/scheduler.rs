//! Turn scheduler
//!
//! Decides when the next turn fires from host frame timestamps, so turn speed
//! is independent of frame rate. The scheduler never touches the board; the
//! running flag and timing fields it drives live on [`SimulationState`].

use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::consts::MAX_BACKLOG_TURNS;
use crate::error::{SimError, SimResult};

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerPhase {
    Stopped,
    Running,
}

/// Whether the host should schedule another frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// Call `on_frame` again on the next host frame
    Request,
    /// Do not re-request; the loop is over (or already pending)
    Halt,
}

impl FrameRequest {
    pub fn is_request(&self) -> bool {
        matches!(self, FrameRequest::Request)
    }
}

/// How the last-turn timestamp advances after a turn fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Reset to the frame timestamp: turns come at most once per interval,
    /// and frame jitter accumulates as drift
    #[default]
    DriftAccepting,
    /// Advance by exactly one interval, keeping the long-run rate; resyncs
    /// when the backlog grows past `MAX_BACKLOG_TURNS` intervals
    FixedIncrement,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::DriftAccepting => "drift_accepting",
            Cadence::FixedIncrement => "fixed_increment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "drift_accepting" | "drift" => Some(Cadence::DriftAccepting),
            "fixed_increment" | "fixed" => Some(Cadence::FixedIncrement),
            _ => None,
        }
    }
}

/// Validate a turn interval (positive and finite)
pub fn validate_interval(ms: f64) -> SimResult<f64> {
    if ms.is_finite() && ms > 0.0 {
        Ok(ms)
    } else {
        Err(SimError::InvalidInterval { ms })
    }
}

/// Timed-turn scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnScheduler {
    cadence: Cadence,
}

impl TurnScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self { cadence }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn phase(&self, state: &SimulationState) -> SchedulerPhase {
        if state.running {
            SchedulerPhase::Running
        } else {
            SchedulerPhase::Stopped
        }
    }

    /// Stopped -> Running. Only the first call asks the host for frames.
    pub fn start(&self, state: &mut SimulationState, now: f64) -> FrameRequest {
        if state.running {
            return FrameRequest::Halt;
        }
        state.running = true;
        state.last_turn_timestamp = now;
        FrameRequest::Request
    }

    /// Running -> Stopped. Board state is untouched.
    pub fn stop(&self, state: &mut SimulationState) -> bool {
        let was_running = state.running;
        state.running = false;
        was_running
    }

    /// Change the interval for all future comparisons
    pub fn set_interval(&self, state: &mut SimulationState, ms: f64) -> SimResult<()> {
        state.turn_interval_ms = validate_interval(ms)?;
        Ok(())
    }

    /// True if a turn should fire on the frame at `ts`
    pub fn turn_due(&self, state: &SimulationState, ts: f64) -> bool {
        state.running && ts - state.last_turn_timestamp >= state.turn_interval_ms
    }

    /// Record that a turn fired on the frame at `ts`
    pub fn mark_turn(&self, state: &mut SimulationState, ts: f64) {
        match self.cadence {
            Cadence::DriftAccepting => state.last_turn_timestamp = ts,
            Cadence::FixedIncrement => {
                let next = state.last_turn_timestamp + state.turn_interval_ms;
                if ts - next >= state.turn_interval_ms * MAX_BACKLOG_TURNS {
                    log::warn!(
                        "Turn backlog of {:.0} ms, resyncing scheduler",
                        ts - state.last_turn_timestamp
                    );
                    state.last_turn_timestamp = ts;
                } else {
                    state.last_turn_timestamp = next;
                }
            }
        }
    }

    /// Frame request after a frame has been handled
    pub fn next_frame(&self, state: &SimulationState) -> FrameRequest {
        if state.running {
            FrameRequest::Request
        } else {
            FrameRequest::Halt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state(interval: f64, now: f64, scheduler: &TurnScheduler) -> SimulationState {
        let mut state = SimulationState::default();
        scheduler.set_interval(&mut state, interval).unwrap();
        assert_eq!(scheduler.start(&mut state, now), FrameRequest::Request);
        state
    }

    #[test]
    fn test_start_stop_transitions() {
        let scheduler = TurnScheduler::default();
        let mut state = SimulationState::default();
        assert_eq!(scheduler.phase(&state), SchedulerPhase::Stopped);
        assert!(!scheduler.stop(&mut state));

        assert_eq!(scheduler.start(&mut state, 10.0), FrameRequest::Request);
        assert_eq!(scheduler.phase(&state), SchedulerPhase::Running);
        assert_eq!(state.last_turn_timestamp(), 10.0);

        // Second start neither restarts the clock nor asks for a second loop
        assert_eq!(scheduler.start(&mut state, 50.0), FrameRequest::Halt);
        assert_eq!(state.last_turn_timestamp(), 10.0);

        assert!(scheduler.stop(&mut state));
        assert_eq!(scheduler.phase(&state), SchedulerPhase::Stopped);
        assert_eq!(scheduler.next_frame(&state), FrameRequest::Halt);
    }

    #[test]
    fn test_turn_due_threshold() {
        let scheduler = TurnScheduler::default();
        let state = running_state(100.0, 0.0, &scheduler);
        assert!(!scheduler.turn_due(&state, 99.9));
        assert!(scheduler.turn_due(&state, 100.0));
        assert!(scheduler.turn_due(&state, 250.0));
    }

    #[test]
    fn test_drift_accepting_resets_to_frame() {
        let scheduler = TurnScheduler::new(Cadence::DriftAccepting);
        let mut state = running_state(100.0, 0.0, &scheduler);
        scheduler.mark_turn(&mut state, 116.0);
        assert_eq!(state.last_turn_timestamp(), 116.0);
        assert!(!scheduler.turn_due(&state, 200.0));
    }

    #[test]
    fn test_fixed_increment_keeps_rate() {
        let scheduler = TurnScheduler::new(Cadence::FixedIncrement);
        let mut state = running_state(100.0, 0.0, &scheduler);
        scheduler.mark_turn(&mut state, 116.0);
        assert_eq!(state.last_turn_timestamp(), 100.0);
        assert!(scheduler.turn_due(&state, 200.0));
    }

    #[test]
    fn test_fixed_increment_resyncs_after_long_gap() {
        let scheduler = TurnScheduler::new(Cadence::FixedIncrement);
        let mut state = running_state(100.0, 0.0, &scheduler);
        scheduler.mark_turn(&mut state, 10_000.0);
        assert_eq!(state.last_turn_timestamp(), 10_000.0);
    }

    #[test]
    fn test_stopped_never_due() {
        let scheduler = TurnScheduler::default();
        let mut state = running_state(100.0, 0.0, &scheduler);
        scheduler.stop(&mut state);
        assert!(!scheduler.turn_due(&state, 1_000_000.0));
    }

    #[test]
    fn test_set_interval_rejects_non_positive() {
        let scheduler = TurnScheduler::default();
        let mut state = SimulationState::default();
        scheduler.set_interval(&mut state, 250.0).unwrap();

        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                scheduler.set_interval(&mut state, bad),
                Err(SimError::InvalidInterval { .. })
            ));
            assert_eq!(state.turn_interval_ms(), 250.0);
        }
    }

    #[test]
    fn test_cadence_from_str() {
        assert_eq!(Cadence::from_str("Fixed-Increment"), Some(Cadence::FixedIncrement));
        assert_eq!(Cadence::from_str("drift"), Some(Cadence::DriftAccepting));
        assert_eq!(Cadence::from_str("bogus"), None);
        assert_eq!(Cadence::FixedIncrement.as_str(), "fixed_increment");
    }
}
