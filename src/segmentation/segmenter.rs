//! Boundary-refinement segmentation of training examples
//!
//! Three examples of one gesture word are each split into three regions,
//! one per hidden state. Starting from an even split, every pass pools the
//! regions across examples, computes their mean and standard deviation, and
//! nudges each boundary by one sample whenever the sample next to it is
//! statistically closer to the neighbouring region. The search stops at the
//! first pass that moves nothing.

use super::boundaries::BoundaryIndices;
use crate::error::{HmmError, HmmResult};
use crate::models::{Emission, Gaussian, State, TransitionMatrix, N_STATES};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Number of training examples per gesture word
pub const N_EXAMPLES: usize = 3;

/// Segmenter configuration
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Maximum refinement passes before giving up
    pub max_iterations: usize,
    /// Decimal places kept in the reported means and standard deviations
    pub decimals: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            decimals: 3,
        }
    }
}

/// Parameters of one word for one tracked dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    /// Pooled region means per state (rounded)
    pub means: [f64; N_STATES],
    /// Pooled region standard deviations per state (rounded)
    pub stds: [f64; N_STATES],
    /// Left-to-right transitions derived from pooled dwell times
    pub transitions: TransitionMatrix,
    /// Converged boundaries per example
    pub boundaries: [BoundaryIndices; N_EXAMPLES],
    /// Number of refinement passes run
    pub iterations: usize,
}

impl SegmentationResult {
    /// Emission parameters per state.
    ///
    /// Fails if a rounded standard deviation is zero.
    pub fn emissions(&self) -> HmmResult<[Emission; N_STATES]> {
        let mut emissions = [None; N_STATES];
        for s in State::ALL {
            let i = s.index();
            emissions[i] = Some(Gaussian::new(self.means[i], self.stds[i])?);
        }
        Ok(emissions)
    }
}

/// Mean and population standard deviation of one pooled region
#[derive(Debug, Clone, Copy)]
struct RegionStats {
    mean: f64,
    std: f64,
}

impl RegionStats {
    /// Distance of `x` from the region in standard deviations
    fn distance(&self, x: f64) -> f64 {
        (x - self.mean).abs() / self.std
    }
}

/// `true` if `x` is strictly closer to `to` than to `than`
fn closer(x: f64, to: &RegionStats, than: &RegionStats) -> bool {
    to.distance(x) < than.distance(x)
}

fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (x * factor).round() / factor
}

/// Sequence segmenter for one word and one tracked dimension
#[derive(Debug, Clone, Default)]
pub struct SequenceSegmenter {
    config: SegmenterConfig,
}

impl SequenceSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Set the pass cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the rounding precision of reported statistics
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.config.decimals = decimals;
        self
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment three examples of one word
    ///
    /// # Arguments
    /// * `sequences` - The three training examples
    /// * `seed` - Starting boundaries; defaults to [`BoundaryIndices::initial`]
    ///
    /// # Returns
    /// Rounded per-state means and deviations, transitions and final boundaries
    pub fn segment(
        &self,
        sequences: [&[f64]; N_EXAMPLES],
        seed: Option<[BoundaryIndices; N_EXAMPLES]>,
    ) -> HmmResult<SegmentationResult> {
        for (k, seq) in sequences.iter().enumerate() {
            if let Some(t) = seq.iter().position(|x| !x.is_finite()) {
                return Err(HmmError::InvalidInput(format!(
                    "non-finite sample at {} in example {}",
                    t, k
                )));
            }
        }

        let mut boundaries =
            seed.unwrap_or_else(|| sequences.map(|s| BoundaryIndices::initial(s.len())));
        for (k, (b, seq)) in boundaries.iter().zip(sequences.iter()).enumerate() {
            b.validate(k, seq.len())?;
        }

        let mut passes = 0;
        let stats = loop {
            if passes >= self.config.max_iterations {
                tracing::warn!(passes, ?boundaries, "boundary refinement hit the pass cap");
                return Err(HmmError::NonConvergentSegmentation {
                    iterations: self.config.max_iterations,
                });
            }
            passes += 1;

            let stats = pooled_stats(&sequences, &boundaries)?;
            let mut moves = 0;
            for (seq, b) in sequences.iter().zip(boundaries.iter_mut()) {
                if refine(seq, b, &stats) {
                    moves += 1;
                }
            }

            tracing::debug!(pass = passes, moves, "boundary refinement pass");

            if moves == 0 {
                break stats;
            }
        };

        let transitions = dwell_transitions(&sequences, &boundaries)?;
        tracing::info!(passes, ?boundaries, "segmentation converged");

        let decimals = self.config.decimals;
        Ok(SegmentationResult {
            means: stats.map(|s| round_to(s.mean, decimals)),
            stds: stats.map(|s| round_to(s.std, decimals)),
            transitions,
            boundaries,
            iterations: passes,
        })
    }
}

/// Segment with the default configuration
pub fn segment(
    sequences: [&[f64]; N_EXAMPLES],
    seed: Option<[BoundaryIndices; N_EXAMPLES]>,
) -> HmmResult<SegmentationResult> {
    SequenceSegmenter::new().segment(sequences, seed)
}

/// Pool each region across all examples and summarize it
fn pooled_stats(
    sequences: &[&[f64]; N_EXAMPLES],
    boundaries: &[BoundaryIndices; N_EXAMPLES],
) -> HmmResult<[RegionStats; N_STATES]> {
    let mut pooled: [Vec<f64>; N_STATES] = Default::default();
    for (seq, b) in sequences.iter().zip(boundaries.iter()) {
        for (region, samples) in pooled.iter_mut().zip(b.regions(seq)) {
            region.extend_from_slice(samples);
        }
    }

    let mut stats = [RegionStats { mean: 0.0, std: 0.0 }; N_STATES];
    for s in State::ALL {
        let region = &pooled[s.index()];
        if region.is_empty() {
            return Err(HmmError::DegenerateSegmentation { state: s });
        }
        let mean = region.iter().mean();
        let std = region.iter().population_std_dev();
        if !(std.is_finite() && std > 0.0) {
            return Err(HmmError::ZeroVariance { state: s });
        }
        stats[s.index()] = RegionStats { mean, std };
    }
    Ok(stats)
}

/// One refinement step for one example; returns whether a boundary moved
fn refine(
    sequence: &[f64],
    boundaries: &mut BoundaryIndices,
    stats: &[RegionStats; N_STATES],
) -> bool {
    let len = sequence.len();
    let BoundaryIndices { index1, index2 } = *boundaries;
    let [r1, r2, r3] = stats;

    let mut new1 = index1;
    if index1 > 1 && closer(sequence[index1 - 1], r2, r1) {
        new1 = index1 - 1;
    } else if closer(sequence[index1], r1, r2) {
        new1 = index1 + 1;
    }

    let mut new2 = index2;
    if closer(sequence[index2 - 1], r3, r2) {
        new2 = index2 - 1;
    } else if index2 < len - 1 && closer(sequence[index2], r2, r3) {
        new2 = index2 + 1;
    }

    // Moves that would collapse or invert the middle region are dropped together
    if new1 + 1 > new2 {
        return false;
    }

    *boundaries = BoundaryIndices::new(new1, new2);
    new1 != index1 || new2 != index2
}

/// Advance probability per state: examples / pooled segment length
fn dwell_transitions(
    sequences: &[&[f64]; N_EXAMPLES],
    boundaries: &[BoundaryIndices; N_EXAMPLES],
) -> HmmResult<TransitionMatrix> {
    let mut totals = [0usize; N_STATES];
    for (seq, b) in sequences.iter().zip(boundaries.iter()) {
        for (total, n) in totals.iter_mut().zip(b.segment_lengths(seq.len())) {
            *total += n;
        }
    }

    let mut advance = [0.0; N_STATES];
    for s in State::ALL {
        let total = totals[s.index()];
        if total == 0 {
            return Err(HmmError::DegenerateSegmentation { state: s });
        }
        advance[s.index()] = N_EXAMPLES as f64 / total as f64;
    }
    TransitionMatrix::from_advance(advance)
}
