use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::TrainingError;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..rows` with a fixed seed and hold out `ceil(test_fraction * rows)`
pub fn train_test_split(rows: usize, test_fraction: f64, seed: u64) -> Result<TrainTestSplit, TrainingError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainingError::InvalidParameters {
            details: format!("test_fraction must be in (0, 1), got {}", test_fraction),
        });
    }

    let test_rows = (test_fraction * rows as f64).ceil() as usize;
    let train_rows = rows.saturating_sub(test_rows);

    if test_rows == 0 {
        return Err(TrainingError::EmptyPartition { rows, partition: "evaluation".to_string() });
    }
    if train_rows == 0 {
        return Err(TrainingError::EmptyPartition { rows, partition: "training".to_string() });
    }

    let mut permutation: Vec<usize> = (0..rows).collect();
    permutation.shuffle(&mut StdRng::seed_from_u64(seed));

    let test = permutation[..test_rows].to_vec();
    let train = permutation[test_rows..].to_vec();

    Ok(TrainTestSplit { train, test })
}
