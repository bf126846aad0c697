//! # Gesture HMM
//!
//! Gesture recognition building blocks around a three-state, left-to-right
//! hidden Markov model per gesture word.
//!
//! ## Modules
//!
//! - `segmentation` - Boundary refinement over three training examples,
//!   producing per-state Gaussian parameters and transitions
//! - `models` - States, Gaussian emissions, transitions and Viterbi decoding
//! - `data` - Observation sequences, CSV training sets, synthetic gestures
//!
//! ## Example
//!
//! ```
//! use gesture_hmm::prelude::*;
//!
//! let a = vec![0.1, -0.1, 0.0, 5.1, 4.9, 5.0, 9.9, 10.1, 10.0];
//! let b = vec![0.0, 0.1, -0.1, 0.05, 5.0, 5.1, 4.9, 5.0, 10.0, 9.9, 10.1, 10.0];
//! let c = vec![0.1, 0.0, -0.1, 0.0, 0.05, 5.0, 4.9, 5.1, 5.0, 5.05, 10.0, 9.9, 10.1, 10.0, 9.95];
//!
//! let result = segment([&a[..], &b[..], &c[..]], None)?;
//! let model = WordModel::from_segmentations("raise", &[result])?;
//! let path = model.decode(&[0.0, 0.1, 5.0, 9.8])?;
//! assert_eq!(path.labels(), vec![1, 1, 2, 3]);
//! # Ok::<(), gesture_hmm::HmmError>(())
//! ```

pub mod data;
pub mod error;
pub mod models;
pub mod segmentation;

pub use error::{HmmError, HmmResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::data::{ObservationSequence, SyntheticGesture, TrainingSet};
    pub use crate::error::{HmmError, HmmResult};
    pub use crate::models::{
        viterbi, viterbi_nd, Emission, Gaussian, GesturePath, State, TransitionMatrix, Transitions,
        WordModel,
    };
    pub use crate::segmentation::{segment, BoundaryIndices, SegmentationResult, SequenceSegmenter};
}
