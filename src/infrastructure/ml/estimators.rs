//! Library-backed estimators (random forest, Gaussian naive Bayes)

use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::naive_bayes::gaussian::{GaussianNB, GaussianNBParameters};

use crate::domain::DomainError;

pub type ForestModel = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;
pub type BayesModel = GaussianNB<f64, u32, DenseMatrix<f64>, Vec<u32>>;

fn matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, DomainError> {
    if rows.is_empty() {
        return Err(DomainError::model("Empty feature matrix"));
    }
    Ok(DenseMatrix::from_2d_vec(&rows.to_vec()))
}

fn library_error(what: &str, err: smartcore::error::Failed) -> DomainError {
    DomainError::model(format!("{} failed: {}", what, err))
}

pub fn fit_random_forest(
    x: &[Vec<f64>],
    y: &[u32],
    n_trees: u16,
    seed: u64,
) -> Result<ForestModel, DomainError> {
    let params = RandomForestClassifierParameters {
        n_trees,
        seed,
        ..Default::default()
    };

    RandomForestClassifier::fit(&matrix(x)?, &y.to_vec(), params)
        .map_err(|e| library_error("Random forest fit", e))
}

pub fn predict_random_forest(model: &ForestModel, x: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
    model
        .predict(&matrix(x)?)
        .map_err(|e| library_error("Random forest predict", e))
}

pub fn fit_naive_bayes(x: &[Vec<f64>], y: &[u32]) -> Result<BayesModel, DomainError> {
    GaussianNB::fit(&matrix(x)?, &y.to_vec(), GaussianNBParameters::default())
        .map_err(|e| library_error("Naive Bayes fit", e))
}

pub fn predict_naive_bayes(model: &BayesModel, x: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
    model
        .predict(&matrix(x)?)
        .map_err(|e| library_error("Naive Bayes predict", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> (Vec<Vec<f64>>, Vec<u32>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let j = (i % 4) as f64 * 0.5;
            x.push(vec![1.0 + j, 20.0 - j]);
            y.push(0);
            x.push(vec![30.0 - j, 2.0 + j]);
            y.push(1);
        }
        (x, y)
    }

    #[test]
    fn test_random_forest_fit_predict() {
        let (x, y) = data();
        let model = fit_random_forest(&x, &y, 10, 42).unwrap();
        assert_eq!(predict_random_forest(&model, &x).unwrap(), y);
    }

    #[test]
    fn test_naive_bayes_fit_predict() {
        let (x, y) = data();
        let model = fit_naive_bayes(&x, &y).unwrap();
        assert_eq!(predict_naive_bayes(&model, &x).unwrap(), y);
    }

    #[test]
    fn test_empty_matrix_rejected() {
        assert!(fit_naive_bayes(&[], &[]).is_err());
    }
}
