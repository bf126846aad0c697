//! Error types for segmentation and decoding

use crate::models::State;
use thiserror::Error;

/// Errors raised by the segmenter, the emission model and the decoder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HmmError {
    #[error("Degenerate segmentation: pooled segment length for {state} is zero")]
    DegenerateSegmentation { state: State },

    #[error("Segmentation did not converge within {iterations} passes")]
    NonConvergentSegmentation { iterations: usize },

    #[error("Zero variance in pooled region for {state}")]
    ZeroVariance { state: State },

    #[error("Invalid standard deviation: {std} (must be finite and > 0)")]
    InvalidStdDev { std: f64 },

    #[error(
        "Invalid boundaries for example {example}: index1={index1}, index2={index2}, len={len}"
    )]
    InvalidBoundaries {
        example: usize,
        index1: usize,
        index2: usize,
        len: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for HMM operations
pub type HmmResult<T> = Result<T, HmmError>;
