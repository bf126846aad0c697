//! Complete model of one gesture word
//!
//! A word is tracked in one or more dimensions. Each dimension is segmented
//! on its own and contributes its own emissions and transition matrix; the
//! decoder multiplies the per-dimension transition weights together.

use super::gaussian::Emission;
use super::state::N_STATES;
use super::transitions::{ProductTransitions, TransitionMatrix};
use super::viterbi::{score_path_nd, viterbi, viterbi_nd, GesturePath, Priors};
use crate::error::{HmmError, HmmResult};
use crate::models::State;
use crate::segmentation::SegmentationResult;
use serde::{Deserialize, Serialize};

/// Start in the first state with certainty
pub const LEFT_TO_RIGHT_PRIORS: Priors = [1.0, 0.0, 0.0];

/// Emissions and transitions for one tracked dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionModel {
    pub emissions: [Emission; N_STATES],
    pub transitions: TransitionMatrix,
}

impl DimensionModel {
    pub fn from_segmentation(result: &SegmentationResult) -> HmmResult<Self> {
        Ok(Self {
            emissions: result.emissions()?,
            transitions: result.transitions,
        })
    }
}

/// Gesture word model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordModel {
    /// Word label
    pub word: String,
    /// Initial state probabilities
    pub priors: Priors,
    /// One entry per tracked dimension
    pub dimensions: Vec<DimensionModel>,
}

impl WordModel {
    /// Create a model from explicit parameters
    pub fn new(word: &str, priors: Priors, dimensions: Vec<DimensionModel>) -> HmmResult<Self> {
        if dimensions.is_empty() {
            return Err(HmmError::InvalidInput("word model needs at least one dimension".into()));
        }
        Ok(Self {
            word: word.to_string(),
            priors,
            dimensions,
        })
    }

    /// Build from per-dimension segmentation results, starting in state 1
    pub fn from_segmentations(word: &str, results: &[SegmentationResult]) -> HmmResult<Self> {
        let dimensions = results
            .iter()
            .map(DimensionModel::from_segmentation)
            .collect::<HmmResult<Vec<_>>>()?;
        Self::new(word, LEFT_TO_RIGHT_PRIORS, dimensions)
    }

    /// Replace the priors
    pub fn with_priors(mut self, priors: Priors) -> Self {
        self.priors = priors;
        self
    }

    /// Number of tracked dimensions
    pub fn dims(&self) -> usize {
        self.dimensions.len()
    }

    fn transition_parts(&self) -> Vec<TransitionMatrix> {
        self.dimensions.iter().map(|d| d.transitions).collect()
    }

    fn emissions_nd<const D: usize>(&self) -> HmmResult<[[Emission; D]; N_STATES]> {
        if self.dims() != D {
            return Err(HmmError::InvalidInput(format!(
                "model '{}' tracks {} dimensions, evidence has {}",
                self.word,
                self.dims(),
                D
            )));
        }
        Ok(State::ALL.map(|s| std::array::from_fn(|d| self.dimensions[d].emissions[s.index()])))
    }

    /// Decode scalar evidence with a one-dimensional model
    pub fn decode(&self, evidence: &[f64]) -> HmmResult<GesturePath> {
        match self.dimensions.as_slice() {
            [dim] => viterbi(evidence, &self.priors, &dim.transitions, &dim.emissions),
            _ => Err(HmmError::InvalidInput(format!(
                "model '{}' tracks {} dimensions, evidence is scalar",
                self.word,
                self.dims()
            ))),
        }
    }

    /// Decode D-dimensional evidence
    pub fn decode_nd<const D: usize>(&self, evidence: &[[f64; D]]) -> HmmResult<GesturePath> {
        let emissions = self.emissions_nd::<D>()?;
        let parts = self.transition_parts();
        viterbi_nd(evidence, &self.priors, &ProductTransitions::new(&parts), &emissions)
    }

    /// Log joint probability of `path` for D-dimensional evidence
    pub fn score_nd<const D: usize>(
        &self,
        evidence: &[[f64; D]],
        path: &[State],
    ) -> HmmResult<f64> {
        let emissions = self.emissions_nd::<D>()?;
        let parts = self.transition_parts();
        score_path_nd(evidence, path, &self.priors, &ProductTransitions::new(&parts), &emissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{joint_density, Gaussian};
    use approx::assert_relative_eq;

    fn dimension(means: [f64; N_STATES], advance: [f64; N_STATES]) -> DimensionModel {
        DimensionModel {
            emissions: means.map(|m| Some(Gaussian::new(m, 0.5).unwrap())),
            transitions: TransitionMatrix::from_advance(advance).unwrap(),
        }
    }

    fn two_dim_model() -> WordModel {
        WordModel::new(
            "wave",
            LEFT_TO_RIGHT_PRIORS,
            vec![
                dimension([0.0, 5.0, 10.0], [0.3, 0.3, 0.2]),
                dimension([10.0, 0.0, 5.0], [0.4, 0.2, 0.5]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_requires_a_dimension() {
        assert!(WordModel::new("empty", LEFT_TO_RIGHT_PRIORS, vec![]).is_err());
    }

    #[test]
    fn test_scalar_decode() {
        let dims = vec![dimension([0.0, 5.0, 10.0], [0.3, 0.3, 0.2])];
        let model = WordModel::new("tap", LEFT_TO_RIGHT_PRIORS, dims).unwrap();
        let path = model.decode(&[0.0, 0.2, 5.1, 9.9]).unwrap();
        assert_eq!(path.labels(), vec![1, 1, 2, 3]);
        assert!(two_dim_model().decode(&[0.0]).is_err());
    }

    #[test]
    fn test_nd_decode() {
        let model = two_dim_model();
        let evidence = [[0.1, 9.9], [5.0, 0.1], [4.9, -0.2], [10.0, 5.0]];
        let path = model.decode_nd(&evidence).unwrap();
        assert_eq!(path.labels(), vec![1, 2, 2, 3]);
        assert_relative_eq!(
            model.score_nd(&evidence, &path.states).unwrap(),
            path.log_probability,
            epsilon = 1e-9
        );
        assert!(model.decode_nd(&[[0.0, 1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_product_of_transitions_in_score() {
        let model = two_dim_model();
        let evidence = [[0.0, 10.0], [5.0, 0.0]];
        let path = [State::S1, State::S2];
        let emissions = model.emissions_nd::<2>().unwrap();

        let expected = joint_density(&evidence[0], &emissions[0])
            * (0.3 * 0.4)
            * joint_density(&evidence[1], &emissions[1]);
        assert_relative_eq!(
            model.score_nd(&evidence, &path).unwrap(),
            expected.ln(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_unset_emissions() {
        let mut model = two_dim_model();
        model.dimensions[1].emissions[2] = None;
        let json = serde_json::to_string(&model).unwrap();
        let back: WordModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_load_rejects_invalid_transitions() {
        let model = two_dim_model();
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains(r#""advance":[0.3,0.3,0.2]"#));

        let broken = json.replacen(r#""advance":[0.3,0.3,0.2]"#, r#""advance":[1.5,0.5,0.5]"#, 1);
        assert!(serde_json::from_str::<WordModel>(&broken).is_err());
    }
}
