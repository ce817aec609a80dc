//! Simulation state
//!
//! The only mutable data in the simulation. The turn engine owns position,
//! visits and turn count; the scheduler and controller own the running flag
//! and timing fields.

use serde::{Deserialize, Serialize};

use super::scheduler::validate_interval;
use crate::consts::{BOARD_SPACES, DEFAULT_TURN_INTERVAL_MS};
use crate::error::{SimError, SimResult};

/// Whether the token's starting square counts as a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialPlacement {
    /// Visits start at zero everywhere
    #[default]
    Uncounted,
    /// Space 0 starts with one visit
    CountStart,
}

impl InitialPlacement {
    /// Visits recorded before the first turn
    pub fn initial_visits(&self) -> u64 {
        match self {
            InitialPlacement::Uncounted => 0,
            InitialPlacement::CountStart => 1,
        }
    }
}

/// Complete simulation state (serializable for debugging dumps)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSimulationState")]
pub struct SimulationState {
    /// Current token space (always < 40)
    pub(crate) position: usize,
    /// Landings per space since the last reset
    #[serde(with = "visit_array")]
    pub(crate) visit_counts: [u64; BOARD_SPACES],
    /// Turns completed since the last reset
    pub(crate) turns_taken: u64,
    /// Whether the scheduler is advancing turns
    pub(crate) running: bool,
    /// Minimum time between turns (ms)
    pub(crate) turn_interval_ms: f64,
    /// Host timestamp of the last turn (or of `start`)
    pub(crate) last_turn_timestamp: f64,
    /// Starting-square convention, reapplied on reset
    pub(crate) initial_placement: InitialPlacement,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(DEFAULT_TURN_INTERVAL_MS, InitialPlacement::default())
    }
}

impl SimulationState {
    /// Fresh state with the token on space 0 and the scheduler stopped
    pub fn new(turn_interval_ms: f64, initial_placement: InitialPlacement) -> Self {
        let mut state = Self {
            position: 0,
            visit_counts: [0; BOARD_SPACES],
            turns_taken: 0,
            running: false,
            turn_interval_ms,
            last_turn_timestamp: 0.0,
            initial_placement,
        };
        state.clear_board();
        state
    }

    /// Put the token back on space 0 and reapply the placement convention
    pub(crate) fn clear_board(&mut self) {
        self.position = 0;
        self.visit_counts = [0; BOARD_SPACES];
        self.visit_counts[0] = self.initial_placement.initial_visits();
        self.turns_taken = 0;
    }

    /// Move the token without counting a visit (test setups, replays)
    pub fn place_token(&mut self, space: usize) -> SimResult<()> {
        if space >= BOARD_SPACES {
            return Err(SimError::SpaceOutOfRange { index: space });
        }
        self.position = space;
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn visit_counts(&self) -> &[u64; BOARD_SPACES] {
        &self.visit_counts
    }

    pub fn turns_taken(&self) -> u64 {
        self.turns_taken
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn turn_interval_ms(&self) -> f64 {
        self.turn_interval_ms
    }

    pub fn last_turn_timestamp(&self) -> f64 {
        self.last_turn_timestamp
    }

    pub fn initial_placement(&self) -> InitialPlacement {
        self.initial_placement
    }

    /// Sum of all visit counts
    pub fn total_visits(&self) -> u64 {
        self.visit_counts.iter().sum()
    }

    /// Visits expected from turns plus the starting convention
    pub fn expected_visits(&self) -> u64 {
        self.turns_taken + self.initial_placement.initial_visits()
    }
}

/// Unchecked wire form; every load goes through the `TryFrom` below
#[derive(Deserialize)]
struct RawSimulationState {
    position: usize,
    #[serde(with = "visit_array")]
    visit_counts: [u64; BOARD_SPACES],
    turns_taken: u64,
    running: bool,
    turn_interval_ms: f64,
    last_turn_timestamp: f64,
    initial_placement: InitialPlacement,
}

impl TryFrom<RawSimulationState> for SimulationState {
    type Error = SimError;

    fn try_from(raw: RawSimulationState) -> SimResult<Self> {
        if raw.position >= BOARD_SPACES {
            return Err(SimError::SpaceOutOfRange {
                index: raw.position,
            });
        }
        let turn_interval_ms = validate_interval(raw.turn_interval_ms)?;
        Ok(Self {
            position: raw.position,
            visit_counts: raw.visit_counts,
            turns_taken: raw.turns_taken,
            running: raw.running,
            turn_interval_ms,
            last_turn_timestamp: raw.last_turn_timestamp,
            initial_placement: raw.initial_placement,
        })
    }
}

/// serde adapter for the fixed 40-entry visit array
pub(crate) mod visit_array {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::consts::BOARD_SPACES;

    pub fn serialize<S: Serializer>(
        counts: &[u64; BOARD_SPACES],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        counts.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u64; BOARD_SPACES], D::Error> {
        let counts = Vec::<u64>::deserialize(deserializer)?;
        counts
            .try_into()
            .map_err(|v: Vec<u64>| D::Error::invalid_length(v.len(), &"40 visit counts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SimulationState::default();
        assert_eq!(state.position(), 0);
        assert_eq!(state.total_visits(), 0);
        assert!(!state.is_running());
        assert_eq!(state.turn_interval_ms(), DEFAULT_TURN_INTERVAL_MS);
    }

    #[test]
    fn test_count_start_placement() {
        let state = SimulationState::new(100.0, InitialPlacement::CountStart);
        assert_eq!(state.visit_counts()[0], 1);
        assert_eq!(state.total_visits(), state.expected_visits());
    }

    #[test]
    fn test_place_token_validates() {
        let mut state = SimulationState::default();
        state.place_token(39).unwrap();
        assert_eq!(state.position(), 39);
        assert!(matches!(
            state.place_token(40),
            Err(SimError::SpaceOutOfRange { index: 40 })
        ));
        // Rejected call leaves the token alone
        assert_eq!(state.position(), 39);
        assert_eq!(state.total_visits(), 0);
    }

    #[test]
    fn test_state_json_dump() {
        let state = SimulationState::new(250.0, InitialPlacement::CountStart);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"initial_placement\":\"count_start\""));
        let back: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_state_json_rejects_off_board_position() {
        let mut value = serde_json::to_value(SimulationState::default()).unwrap();
        value["position"] = serde_json::json!(45);
        let err = serde_json::from_value::<SimulationState>(value).unwrap_err();
        assert!(err.to_string().contains("Space 45 is outside the board"));

        let mut value = serde_json::to_value(SimulationState::default()).unwrap();
        value["turn_interval_ms"] = serde_json::json!(0.0);
        assert!(serde_json::from_value::<SimulationState>(value).is_err());
    }
}
