//! Observation sequences and training sets

use crate::error::{HmmError, HmmResult};
use crate::models::WordModel;
use crate::segmentation::{SegmentationResult, SequenceSegmenter, N_EXAMPLES};
use ndarray::{Array1, Array2, Axis};
use std::path::Path;

/// One recorded example: rows are samples, columns are tracked dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSequence {
    pub data: Array2<f64>,
}

impl ObservationSequence {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// One-dimensional sequence
    pub fn from_values(values: Vec<f64>) -> Self {
        let data = Array1::from(values).insert_axis(Axis(1));
        Self { data }
    }

    /// Sequence of fixed-size points
    pub fn from_points<const D: usize>(points: &[[f64; D]]) -> Self {
        let mut data = Array2::zeros((points.len(), D));
        for (mut row, point) in data.rows_mut().into_iter().zip(points) {
            row.assign(&Array1::from(point.to_vec()));
        }
        Self { data }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Number of tracked dimensions
    pub fn dims(&self) -> usize {
        self.data.ncols()
    }

    /// Samples of one dimension
    pub fn column(&self, d: usize) -> Vec<f64> {
        self.data.column(d).to_vec()
    }

    /// Samples as fixed-size points; fails if the dimension count differs
    pub fn points<const D: usize>(&self) -> HmmResult<Vec<[f64; D]>> {
        if self.dims() != D {
            return Err(HmmError::InvalidInput(format!(
                "sequence has {} dimensions, expected {}",
                self.dims(),
                D
            )));
        }
        Ok(self
            .data
            .rows()
            .into_iter()
            .map(|row| std::array::from_fn(|d| row[d]))
            .collect())
    }

    /// Load from CSV: a header row, then one sample per row and one column per dimension
    pub fn from_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let dims = reader.headers()?.len();
        let mut values = Vec::new();
        let mut rows = 0;

        for result in reader.records() {
            let record = result?;
            if record.len() != dims {
                anyhow::bail!(
                    "{}: row {} has {} columns, expected {}",
                    path.as_ref().display(),
                    rows + 1,
                    record.len(),
                    dims
                );
            }
            for field in record.iter() {
                values.push(field.trim().parse::<f64>()?);
            }
            rows += 1;
        }

        Ok(Self::new(Array2::from_shape_vec((rows, dims), values)?))
    }

    /// Save to CSV with the given column names
    pub fn to_csv<P: AsRef<Path>>(&self, path: P, names: &[&str]) -> anyhow::Result<()> {
        if names.len() != self.dims() {
            anyhow::bail!("{} column names for {} dimensions", names.len(), self.dims());
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(names)?;
        for row in self.data.rows() {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Three examples of one gesture word
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub word: String,
    pub examples: [ObservationSequence; N_EXAMPLES],
}

impl TrainingSet {
    /// Create a training set; all examples must track the same dimensions
    pub fn new(word: &str, examples: [ObservationSequence; N_EXAMPLES]) -> HmmResult<Self> {
        let dims = examples[0].dims();
        if dims == 0 {
            return Err(HmmError::InvalidInput("examples track no dimensions".into()));
        }
        if let Some(k) = examples.iter().position(|e| e.dims() != dims) {
            return Err(HmmError::InvalidInput(format!(
                "example {} tracks {} dimensions, expected {}",
                k,
                examples[k].dims(),
                dims
            )));
        }
        Ok(Self {
            word: word.to_string(),
            examples,
        })
    }

    /// Load three CSV examples
    pub fn from_csv<P: AsRef<Path>>(word: &str, paths: &[P; N_EXAMPLES]) -> anyhow::Result<Self> {
        let [a, b, c] = paths;
        let examples = [
            ObservationSequence::from_csv(a)?,
            ObservationSequence::from_csv(b)?,
            ObservationSequence::from_csv(c)?,
        ];
        Ok(Self::new(word, examples)?)
    }

    pub fn dims(&self) -> usize {
        self.examples[0].dims()
    }

    /// The three examples' samples for dimension `d`
    pub fn dimension(&self, d: usize) -> [Vec<f64>; N_EXAMPLES] {
        [
            self.examples[0].column(d),
            self.examples[1].column(d),
            self.examples[2].column(d),
        ]
    }

    /// Segment every dimension independently
    pub fn segment(&self, segmenter: &SequenceSegmenter) -> HmmResult<Vec<SegmentationResult>> {
        (0..self.dims())
            .map(|d| {
                let [a, b, c] = self.dimension(d);
                tracing::debug!(word = %self.word, dimension = d, "segmenting");
                segmenter.segment([a.as_slice(), b.as_slice(), c.as_slice()], None)
            })
            .collect()
    }

    /// Segment and assemble a word model
    pub fn train(&self, segmenter: &SequenceSegmenter) -> HmmResult<WordModel> {
        let results = self.segment(segmenter)?;
        WordModel::from_segmentations(&self.word, &results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_points_and_columns() {
        let seq = ObservationSequence::from_points(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.dims(), 2);
        assert_eq!(seq.column(1), vec![2.0, 4.0, 6.0]);
        assert_eq!(seq.points::<2>().unwrap()[2], [5.0, 6.0]);
        assert!(seq.points::<3>().is_err());
        assert_eq!(seq.data, arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]));
    }

    #[test]
    fn test_from_values() {
        let seq = ObservationSequence::from_values(vec![1.0, 2.0]);
        assert_eq!(seq.dims(), 1);
        assert_eq!(seq.column(0), vec![1.0, 2.0]);
    }

    #[test]
    fn test_training_set_dimension_mismatch() {
        let one = ObservationSequence::from_values(vec![0.0; 6]);
        let two = ObservationSequence::from_points(&[[0.0, 0.0]; 6]);
        assert!(TrainingSet::new("w", [one.clone(), one.clone(), two]).is_err());
        assert!(TrainingSet::new("w", [one.clone(), one.clone(), one]).is_ok());
    }

    #[test]
    fn test_csv_roundtrip() {
        let path = std::env::temp_dir()
            .join(format!("gesture_hmm_types_{}.csv", std::process::id()));
        let seq = ObservationSequence::from_points(&[[0.5, -1.0], [2.25, 3.0]]);
        seq.to_csv(&path, &["hand_y", "elbow_y"]).unwrap();
        let back = ObservationSequence::from_csv(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(back, seq);
    }
}
