//! Synthetic gesture generator
//!
//! Produces piecewise-constant recordings: each tracked dimension holds one
//! level per hidden state for a third of the recording, plus Gaussian noise.

use super::types::{ObservationSequence, TrainingSet};
use crate::error::{HmmError, HmmResult};
use crate::models::{Gaussian, State, N_STATES};
use crate::segmentation::N_EXAMPLES;
use ndarray::Array2;
use rand::Rng;

/// Generator for noisy three-phase gestures
#[derive(Debug, Clone)]
pub struct SyntheticGesture {
    /// Level per state, one entry per tracked dimension
    levels: Vec<[f64; N_STATES]>,
    /// Zero-mean measurement noise
    noise: Gaussian,
}

impl SyntheticGesture {
    pub fn new(levels: Vec<[f64; N_STATES]>, noise_std: f64) -> HmmResult<Self> {
        if levels.is_empty() {
            return Err(HmmError::InvalidInput("gesture needs at least one dimension".into()));
        }
        Ok(Self {
            levels,
            noise: Gaussian::new(0.0, noise_std)?,
        })
    }

    pub fn dims(&self) -> usize {
        self.levels.len()
    }

    /// Hidden state of every sample in a recording of `len` samples
    pub fn true_states(len: usize) -> Vec<State> {
        (0..len)
            .map(|i| State::ALL[(N_STATES * i / len).min(N_STATES - 1)])
            .collect()
    }

    /// Generate one recording
    pub fn generate<R: Rng>(&self, len: usize, rng: &mut R) -> ObservationSequence {
        let states = Self::true_states(len);
        let mut data = Array2::zeros((len, self.dims()));
        for (t, state) in states.iter().enumerate() {
            for (d, levels) in self.levels.iter().enumerate() {
                data[[t, d]] = levels[state.index()] + self.noise.sample(rng);
            }
        }
        ObservationSequence::new(data)
    }

    /// Generate three examples of different lengths
    pub fn training_set<R: Rng>(
        &self,
        word: &str,
        lengths: [usize; N_EXAMPLES],
        rng: &mut R,
    ) -> HmmResult<TrainingSet> {
        let examples = lengths.map(|len| self.generate(len, rng));
        TrainingSet::new(word, examples)
    }
}
