//! Transition weights between hidden states

use super::state::{State, N_STATES};
use crate::error::{HmmError, HmmResult};
use serde::{Deserialize, Serialize};

/// Source of transition weights for the decoder
pub trait Transitions {
    /// Weight of moving from `from` to `to` in one step
    fn weight(&self, from: State, to: State) -> f64;

    /// Natural log of [`Transitions::weight`]; `-inf` for forbidden moves
    fn log_weight(&self, from: State, to: State) -> f64 {
        self.weight(from, to).ln()
    }
}

/// Left-to-right transition matrix.
///
/// Every state either stays or advances to its successor. For the last
/// state "advancing" means leaving the word, so it has no target state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTransitionMatrix")]
pub struct TransitionMatrix {
    advance: [f64; N_STATES],
}

/// Unchecked stored form; loading goes through [`TransitionMatrix::from_advance`]
#[derive(Deserialize)]
struct RawTransitionMatrix {
    advance: [f64; N_STATES],
}

impl TryFrom<RawTransitionMatrix> for TransitionMatrix {
    type Error = HmmError;

    fn try_from(raw: RawTransitionMatrix) -> HmmResult<Self> {
        Self::from_advance(raw.advance)
    }
}

impl TransitionMatrix {
    /// Build from the per-state probability of advancing
    pub fn from_advance(advance: [f64; N_STATES]) -> HmmResult<Self> {
        for (i, &p) in advance.iter().enumerate() {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(HmmError::InvalidInput(format!(
                    "advance probability for state {} out of [0, 1]: {}",
                    i + 1,
                    p
                )));
            }
        }
        Ok(Self { advance })
    }

    /// Probability of advancing out of `state`
    pub fn advance(&self, state: State) -> f64 {
        self.advance[state.index()]
    }

    /// Probability of staying in `state`
    pub fn stay(&self, state: State) -> f64 {
        1.0 - self.advance[state.index()]
    }

    /// Rows `[stay, advance]` per state
    pub fn rows(&self) -> [[f64; 2]; N_STATES] {
        State::ALL.map(|s| [self.stay(s), self.advance(s)])
    }

    /// Expected number of samples spent in `state` (geometric dwell time)
    pub fn expected_dwell(&self, state: State) -> f64 {
        1.0 / self.advance(state)
    }
}

impl Transitions for TransitionMatrix {
    fn weight(&self, from: State, to: State) -> f64 {
        if from == to {
            self.stay(from)
        } else if from.next() == Some(to) {
            self.advance(from)
        } else {
            0.0
        }
    }
}

/// Dense weights indexed `[from][to]`
impl Transitions for [[f64; N_STATES]; N_STATES] {
    fn weight(&self, from: State, to: State) -> f64 {
        self[from.index()][to.index()]
    }
}

/// Element-wise product of independently estimated transition weights.
///
/// Used when several tracked dimensions were segmented separately: the
/// weight of a move is the product of each dimension's weight for it. This
/// is not a normalized joint transition model; it is kept for compatibility
/// with models trained per dimension.
#[derive(Debug, Clone, Copy)]
pub struct ProductTransitions<'a, T> {
    parts: &'a [T],
}

impl<'a, T: Transitions> ProductTransitions<'a, T> {
    pub fn new(parts: &'a [T]) -> Self {
        Self { parts }
    }
}

impl<T: Transitions> Transitions for ProductTransitions<'_, T> {
    fn weight(&self, from: State, to: State) -> f64 {
        self.parts.iter().map(|t| t.weight(from, to)).product()
    }

    fn log_weight(&self, from: State, to: State) -> f64 {
        self.parts.iter().map(|t| t.log_weight(from, to)).sum()
    }
}
