//! Training-time segmentation
//!
//! Splits three examples of a gesture word into per-state regions and
//! derives emission and transition parameters from them.

mod boundaries;
mod segmenter;

pub use boundaries::BoundaryIndices;
pub use segmenter::{segment, SegmentationResult, SegmenterConfig, SequenceSegmenter, N_EXAMPLES};
