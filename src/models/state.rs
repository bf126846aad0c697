//! Hidden states of a three-state left-to-right word model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hidden states per gesture word
pub const N_STATES: usize = 3;

/// Hidden state of a gesture word.
///
/// The declaration order is also the iteration order used everywhere a
/// maximum is taken, so on equal scores the earlier state wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum State {
    /// Start of the gesture
    S1,
    /// Middle of the gesture
    S2,
    /// End of the gesture
    S3,
}

impl State {
    /// All states in tie-break order
    pub const ALL: [State; N_STATES] = [State::S1, State::S2, State::S3];

    /// Zero-based index into per-state arrays
    pub fn index(self) -> usize {
        match self {
            State::S1 => 0,
            State::S2 => 1,
            State::S3 => 2,
        }
    }

    /// Inverse of [`State::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// One-based label, as used in reports
    pub fn label(self) -> usize {
        self.index() + 1
    }

    /// Successor in the left-to-right chain; `None` for the last state
    pub fn next(self) -> Option<Self> {
        match self {
            State::S1 => Some(State::S2),
            State::S2 => Some(State::S3),
            State::S3 => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state {}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for state in State::ALL {
            assert_eq!(State::from_index(state.index()), Some(state));
        }
        assert_eq!(State::from_index(3), None);
    }

    #[test]
    fn test_chain_order() {
        assert_eq!(State::S1.next(), Some(State::S2));
        assert_eq!(State::S2.next(), Some(State::S3));
        assert_eq!(State::S3.next(), None);
        assert!(State::S1 < State::S2 && State::S2 < State::S3);
    }

    #[test]
    fn test_labels() {
        assert_eq!(State::S1.label(), 1);
        assert_eq!(State::S3.to_string(), "state 3");
    }
}
