//! RoundState enum for tracking whether votes are still hidden.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one estimation round.
///
/// Valid transitions:
/// - Running -> Revealed (reveal)
/// - Revealed -> Running (restart)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    #[default]
    Running,
    Revealed,
}

impl RoundState {
    /// Returns true while votes may still be cast or withdrawn.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, RoundState::Running)
    }

    /// Returns true once the votes are visible to everyone.
    pub fn is_revealed(&self) -> bool {
        matches!(self, RoundState::Revealed)
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoundState::Running => "running",
            RoundState::Revealed => "revealed",
        };
        write!(f, "{}", s)
    }
}
