//! Observation data module
//!
//! Provides observation sequences, three-example training sets with CSV
//! loading, and a synthetic gesture generator.

mod synthetic;
mod types;

pub use synthetic::SyntheticGesture;
pub use types::{ObservationSequence, TrainingSet};
