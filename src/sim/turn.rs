//! Turn engine
//!
//! One turn: roll two dice, walk the token around the ring, count the landing.
//! Never touches the running flag or timing fields.

use serde::{Deserialize, Serialize};

use super::dice::DiceSource;
use super::state::SimulationState;
use crate::consts::{BOARD_SPACES, DIE_FACES};
use crate::wrap_space;

/// Outcome of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub die1: u8,
    pub die2: u8,
    pub new_position: usize,
}

impl TurnResult {
    /// Spaces moved this turn (2..=12)
    pub fn total(&self) -> u8 {
        self.die1 + self.die2
    }

    pub fn is_doubles(&self) -> bool {
        self.die1 == self.die2
    }
}

/// Fold a face from an injected source back into 1..=6
fn checked_face(face: u8) -> u8 {
    if (1..=DIE_FACES).contains(&face) {
        return face;
    }
    log::warn!("Dice source returned face {}, folding into 1-6", face);
    face % DIE_FACES + 1
}

/// Advance the state by one turn
pub fn advance_turn<D: DiceSource + ?Sized>(
    state: &mut SimulationState,
    dice: &mut D,
) -> TurnResult {
    debug_assert!(
        state.position < BOARD_SPACES,
        "advance_turn() called with position {} off the board",
        state.position
    );

    let die1 = checked_face(dice.roll_die());
    let die2 = checked_face(dice.roll_die());
    let steps = usize::from(die1 + die2);

    let new_position = wrap_space(state.position, steps);
    state.position = new_position;
    state.visit_counts[new_position] += 1;
    state.turns_taken += 1;

    log::debug!(
        "Turn {}: rolled {} + {}, landed on {}",
        state.turns_taken,
        die1,
        die2,
        new_position
    );

    TurnResult {
        die1,
        die2,
        new_position,
    }
}
