use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Dataset;
use crate::domain::DomainError;

/// Training and held-out partitions
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Shuffle row indices with a fixed seed and cut off `ceil(n * test_ratio)` test rows
pub fn train_test_split(
    dataset: &Dataset,
    test_ratio: f64,
    seed: u64,
) -> Result<DatasetSplit, DomainError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(DomainError::configuration(format!(
            "test_ratio must be in (0, 1), got {}",
            test_ratio
        )));
    }

    let n = dataset.len();
    let n_test = (n as f64 * test_ratio).ceil() as usize;

    if n_test == 0 || n_test >= n {
        return Err(DomainError::data_load(format!(
            "Dataset with {} rows is too small to split with ratio {}",
            n, test_ratio
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let records = dataset.records();
    let pick = |idx: &[usize]| Dataset::new(idx.iter().map(|&i| records[i].clone()).collect());

    Ok(DatasetSplit {
        test: pick(&indices[..n_test]),
        train: pick(&indices[n_test..]),
    })
}
