//! Viterbi decoding for three-state word models
//!
//! Scores are accumulated in the log domain so that long evidence sequences
//! keep the correct ordering of paths even when the linear joint
//! probability underflows to zero.

use super::gaussian::{joint_log_density, log_density, Emission};
use super::state::{State, N_STATES};
use super::transitions::Transitions;
use crate::error::{HmmError, HmmResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Initial state probabilities, indexed by [`State::index`]
pub type Priors = [f64; N_STATES];

/// Most likely hidden state path for one evidence sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GesturePath {
    /// One state per evidence sample
    pub states: Vec<State>,
    /// Log of the joint probability of the path and the evidence
    pub log_probability: f64,
}

impl GesturePath {
    /// Path for empty evidence: no states, probability 0
    pub fn empty() -> Self {
        Self {
            states: Vec::new(),
            log_probability: f64::NEG_INFINITY,
        }
    }

    /// Joint probability in linear space (may underflow to 0 for long paths)
    pub fn probability(&self) -> f64 {
        self.log_probability.exp()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// One-based state labels
    pub fn labels(&self) -> Vec<usize> {
        self.states.iter().map(|s| s.label()).collect()
    }

    /// Number of samples spent in each state
    pub fn dwell_counts(&self) -> [usize; N_STATES] {
        let mut counts = [0; N_STATES];
        for s in &self.states {
            counts[s.index()] += 1;
        }
        counts
    }
}

/// Decode a scalar evidence sequence
///
/// # Arguments
/// * `evidence` - Observations, one per time step
/// * `priors` - Initial state probabilities
/// * `transitions` - Transition weights
/// * `emissions` - Emission parameters per state (`None` = unset)
///
/// # Returns
/// Most likely state path and its joint log probability
pub fn viterbi<T: Transitions + ?Sized>(
    evidence: &[f64],
    priors: &Priors,
    transitions: &T,
    emissions: &[Emission; N_STATES],
) -> HmmResult<GesturePath> {
    validate_priors(priors)?;
    let log_emissions = scalar_log_emissions(evidence, emissions)?;
    Ok(viterbi_log(priors, transitions, &log_emissions))
}

/// Decode a D-dimensional evidence sequence.
///
/// The emission of each state is the product of its per-dimension densities.
pub fn viterbi_nd<T: Transitions + ?Sized, const D: usize>(
    evidence: &[[f64; D]],
    priors: &Priors,
    transitions: &T,
    emissions: &[[Emission; D]; N_STATES],
) -> HmmResult<GesturePath> {
    validate_priors(priors)?;
    let log_emissions = vector_log_emissions(evidence, emissions)?;
    Ok(viterbi_log(priors, transitions, &log_emissions))
}

/// Log joint probability of a given state path for scalar evidence
pub fn score_path<T: Transitions + ?Sized>(
    evidence: &[f64],
    path: &[State],
    priors: &Priors,
    transitions: &T,
    emissions: &[Emission; N_STATES],
) -> HmmResult<f64> {
    validate_priors(priors)?;
    let log_emissions = scalar_log_emissions(evidence, emissions)?;
    path_log_score(path, priors, transitions, &log_emissions)
}

/// Log joint probability of a given state path for D-dimensional evidence
pub fn score_path_nd<T: Transitions + ?Sized, const D: usize>(
    evidence: &[[f64; D]],
    path: &[State],
    priors: &Priors,
    transitions: &T,
    emissions: &[[Emission; D]; N_STATES],
) -> HmmResult<f64> {
    validate_priors(priors)?;
    let log_emissions = vector_log_emissions(evidence, emissions)?;
    path_log_score(path, priors, transitions, &log_emissions)
}

fn validate_priors(priors: &Priors) -> HmmResult<()> {
    match priors.iter().find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p)) {
        Some(p) => Err(HmmError::InvalidInput(format!("prior out of [0, 1]: {}", p))),
        None => Ok(()),
    }
}

/// Log emission table (T x N_STATES) for scalar evidence
fn scalar_log_emissions(
    evidence: &[f64],
    emissions: &[Emission; N_STATES],
) -> HmmResult<Array2<f64>> {
    let mut table = Array2::zeros((evidence.len(), N_STATES));
    for (t, &x) in evidence.iter().enumerate() {
        if !x.is_finite() {
            return Err(HmmError::InvalidInput(format!("non-finite evidence at {}: {}", t, x)));
        }
        for s in State::ALL {
            table[[t, s.index()]] = log_density(x, &emissions[s.index()]);
        }
    }
    Ok(table)
}

/// Log emission table (T x N_STATES) for vector evidence
fn vector_log_emissions<const D: usize>(
    evidence: &[[f64; D]],
    emissions: &[[Emission; D]; N_STATES],
) -> HmmResult<Array2<f64>> {
    let mut table = Array2::zeros((evidence.len(), N_STATES));
    for (t, x) in evidence.iter().enumerate() {
        if x.iter().any(|v| !v.is_finite()) {
            return Err(HmmError::InvalidInput(format!("non-finite evidence at {}", t)));
        }
        for s in State::ALL {
            table[[t, s.index()]] = joint_log_density(x, &emissions[s.index()]);
        }
    }
    Ok(table)
}

fn log_transition_table<T: Transitions + ?Sized>(transitions: &T) -> [[f64; N_STATES]; N_STATES] {
    State::ALL.map(|from| State::ALL.map(|to| transitions.log_weight(from, to)))
}

/// Max-product recursion over a precomputed log emission table
fn viterbi_log<T: Transitions + ?Sized>(
    priors: &Priors,
    transitions: &T,
    log_emissions: &Array2<f64>,
) -> GesturePath {
    let t = log_emissions.nrows();

    if t == 0 {
        return GesturePath::empty();
    }

    let log_trans = log_transition_table(transitions);

    // Delta: best log score of a path ending in state j at time t
    let mut delta = Array2::from_elem((t, N_STATES), f64::NEG_INFINITY);
    // Psi: back-pointers (state index at t - 1)
    let mut psi = Array2::<usize>::zeros((t, N_STATES));

    for s in State::ALL {
        let j = s.index();
        delta[[0, j]] = priors[j].ln() + log_emissions[[0, j]];
    }

    for t_idx in 1..t {
        for next in State::ALL {
            let j = next.index();
            let mut best_val = f64::NEG_INFINITY;
            let mut best_state = next;

            for cur in State::ALL {
                let prev = delta[[t_idx - 1, cur.index()]];
                // Zero-probability predecessors can never be the argmax
                if prev == f64::NEG_INFINITY {
                    continue;
                }
                let val = prev + log_trans[cur.index()][j];
                if val > best_val {
                    best_val = val;
                    best_state = cur;
                }
            }

            // Unreachable cell: keep the back-pointer on an allowed move when one exists
            if best_val == f64::NEG_INFINITY && log_trans[j][j] == f64::NEG_INFINITY {
                if let Some(cur) = State::ALL
                    .into_iter()
                    .find(|c| log_trans[c.index()][j] > f64::NEG_INFINITY)
                {
                    best_state = cur;
                }
            }

            delta[[t_idx, j]] = best_val + log_emissions[[t_idx, j]];
            psi[[t_idx, j]] = best_state.index();
        }
    }

    // Termination
    let mut best_final_state = State::S1;
    let mut best_final = f64::NEG_INFINITY;
    for s in State::ALL {
        if delta[[t - 1, s.index()]] > best_final {
            best_final = delta[[t - 1, s.index()]];
            best_final_state = s;
        }
    }

    // Backtracking
    let mut states = vec![State::S1; t];
    states[t - 1] = best_final_state;
    for t_idx in (0..t - 1).rev() {
        let back = psi[[t_idx + 1, states[t_idx + 1].index()]];
        states[t_idx] = State::ALL[back];
    }

    tracing::debug!(len = t, log_probability = best_final, "decoded gesture path");

    GesturePath {
        states,
        log_probability: best_final,
    }
}

fn path_log_score<T: Transitions + ?Sized>(
    path: &[State],
    priors: &Priors,
    transitions: &T,
    log_emissions: &Array2<f64>,
) -> HmmResult<f64> {
    if path.len() != log_emissions.nrows() {
        return Err(HmmError::InvalidInput(format!(
            "path length {} != evidence length {}",
            path.len(),
            log_emissions.nrows()
        )));
    }

    let Some(&first) = path.first() else {
        return Ok(f64::NEG_INFINITY);
    };

    let mut score = priors[first.index()].ln() + log_emissions[[0, first.index()]];
    for (t_idx, pair) in path.windows(2).enumerate() {
        score += transitions.log_weight(pair[0], pair[1])
            + log_emissions[[t_idx + 1, pair[1].index()]];
    }
    Ok(score)
}
