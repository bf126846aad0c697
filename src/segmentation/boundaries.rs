//! Region boundaries inside one training example

use crate::error::{HmmError, HmmResult};
use crate::models::N_STATES;
use serde::{Deserialize, Serialize};

/// Split points of one example into three contiguous regions:
/// `[0, index1)`, `[index1, index2)` and `[index2, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryIndices {
    pub index1: usize,
    pub index2: usize,
}

impl BoundaryIndices {
    pub fn new(index1: usize, index2: usize) -> Self {
        Self { index1, index2 }
    }

    /// Default starting split: `index1 = ceil(len / 3)`, `index2 = 2 * index1`
    pub fn initial(len: usize) -> Self {
        let index1 = (len + 2) / 3;
        Self {
            index1,
            index2: 2 * index1,
        }
    }

    /// Check `0 < index1 < index2 < len`
    pub fn validate(&self, example: usize, len: usize) -> HmmResult<()> {
        if 0 < self.index1 && self.index1 < self.index2 && self.index2 < len {
            Ok(())
        } else {
            Err(HmmError::InvalidBoundaries {
                example,
                index1: self.index1,
                index2: self.index2,
                len,
            })
        }
    }

    /// Number of samples in each region
    pub fn segment_lengths(&self, len: usize) -> [usize; N_STATES] {
        [self.index1, self.index2 - self.index1, len - self.index2]
    }

    /// The three regions of `sequence`
    pub fn regions<'a>(&self, sequence: &'a [f64]) -> [&'a [f64]; N_STATES] {
        [
            &sequence[..self.index1],
            &sequence[self.index1..self.index2],
            &sequence[self.index2..],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_split() {
        assert_eq!(BoundaryIndices::initial(9), BoundaryIndices::new(3, 6));
        assert_eq!(BoundaryIndices::initial(10), BoundaryIndices::new(4, 8));
        assert_eq!(BoundaryIndices::initial(3), BoundaryIndices::new(1, 2));
    }

    #[test]
    fn test_validate() {
        assert!(BoundaryIndices::new(3, 6).validate(0, 9).is_ok());
        assert!(BoundaryIndices::new(0, 6).validate(0, 9).is_err());
        assert!(BoundaryIndices::new(4, 4).validate(0, 9).is_err());
        assert_eq!(
            BoundaryIndices::initial(4).validate(2, 4),
            Err(HmmError::InvalidBoundaries { example: 2, index1: 2, index2: 4, len: 4 })
        );
    }

    #[test]
    fn test_regions() {
        let seq = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = BoundaryIndices::new(1, 3);
        let [r1, r2, r3] = b.regions(&seq);
        assert_eq!(r1, &[1.0]);
        assert_eq!(r2, &[2.0, 3.0]);
        assert_eq!(r3, &[4.0, 5.0]);
        assert_eq!(b.segment_lengths(seq.len()), [1, 2, 2]);
    }
}
