//! HMM models module
//!
//! Provides the three-state left-to-right gesture model: states, Gaussian
//! emissions, transitions and Viterbi decoding.

mod gaussian;
mod state;
mod transitions;
mod viterbi;
mod word;

pub use gaussian::{density, joint_density, joint_log_density, log_density, Emission, Gaussian};
pub use state::{State, N_STATES};
pub use transitions::{ProductTransitions, TransitionMatrix, Transitions};
pub use viterbi::{score_path, score_path_nd, viterbi, viterbi_nd, GesturePath, Priors};
pub use word::{DimensionModel, WordModel, LEFT_TO_RIGHT_PRIORS};
