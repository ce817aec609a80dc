//! Visit statistics
//!
//! A [`VisitSnapshot`] is an owned copy of the visit counts, so rendering or
//! charting it is never affected by turns that fire afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SPACES;
use crate::sim::state::visit_array;

/// Visit counts for all 40 spaces at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSnapshot {
    #[serde(with = "visit_array")]
    counts: [u64; BOARD_SPACES],
}

impl Default for VisitSnapshot {
    fn default() -> Self {
        Self {
            counts: [0; BOARD_SPACES],
        }
    }
}

impl From<[u64; BOARD_SPACES]> for VisitSnapshot {
    fn from(counts: [u64; BOARD_SPACES]) -> Self {
        Self { counts }
    }
}

impl VisitSnapshot {
    pub fn counts(&self) -> &[u64; BOARD_SPACES] {
        &self.counts
    }

    /// Visits for one space (None if off the board)
    pub fn get(&self, space: usize) -> Option<u64> {
        self.counts.get(space).copied()
    }

    /// Sum of all visits
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Share of all visits that landed on `space` (0.0 when nothing recorded)
    pub fn frequency(&self, space: usize) -> f64 {
        let total = self.total();
        match self.get(space) {
            Some(count) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Most visited space; the lowest index wins ties
    pub fn most_visited(&self) -> Option<(usize, u64)> {
        self.ranked().into_iter().next().filter(|&(_, count)| count > 0)
    }

    /// Spaces sorted by visits (descending), then by index
    pub fn ranked(&self) -> Vec<(usize, u64)> {
        let mut ranked: Vec<(usize, u64)> = self.counts.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    /// Chart-ready JSON (`{"counts":[...]}`)
    pub fn to_json(&self) -> String {
        // An array of integers always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// The "Visits:" report, one `space: count` line per space
impl fmt::Display for VisitSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Visits:")?;
        for (space, count) in self.counts.iter().enumerate() {
            write!(f, "\n{}: {}", space, count)?;
        }
        Ok(())
    }
}
