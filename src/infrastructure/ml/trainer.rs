//! Fits, evaluates and stores one model per selected kind

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::artifact::{ArtifactStore, FittedModel, ModelArtifact};
use super::estimators;
use super::metrics::{evaluate, EvaluationReport};
use super::{LabelEncoder, MlpClassifier, MlpParams, RandomizedTree, RandomizedTreeParams};
use crate::domain::crop::ModelKind;
use crate::domain::DomainError;
use crate::infrastructure::dataset::{train_test_split, Dataset};

/// Hyperparameters shared by one training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub seed: u64,
    pub test_ratio: f64,
    pub rf_trees: u16,
    /// Used when the MLP is trained on its own
    pub mlp_hidden_layers: Vec<usize>,
    pub mlp_max_iter: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            rf_trees: 100,
            mlp_hidden_layers: vec![100, 50],
            mlp_max_iter: 500,
        }
    }
}

/// Result of fitting one kind
#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub report: EvaluationReport,
    pub path: PathBuf,
}

/// Everything one `run` produced
#[derive(Debug)]
pub struct TrainingRun {
    pub train_rows: usize,
    pub test_rows: usize,
    pub results: Vec<(ModelKind, Result<TrainingOutcome, DomainError>)>,
}

impl TrainingRun {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Hidden layer sizes for the MLP, which depend on whether it trains alone
    pub fn mlp_layers(&self, standalone: bool) -> Vec<usize> {
        if standalone {
            self.config.mlp_hidden_layers.clone()
        } else {
            MlpParams::default().hidden_layers
        }
    }

    /// Fit one kind on the training partition
    pub fn fit(
        &self,
        kind: ModelKind,
        train: &Dataset,
        mlp_layers: &[usize],
    ) -> Result<ModelArtifact, DomainError> {
        let labels = train.labels();
        let encoder = LabelEncoder::fit(&labels)?;
        let y = encoder.encode_all(&labels)?;
        let x = train.feature_rows();
        let seed = self.config.seed;

        let model = match kind {
            ModelKind::RandomForest => FittedModel::RandomForest(estimators::fit_random_forest(
                &x,
                &y,
                self.config.rf_trees,
                seed,
            )?),
            ModelKind::Mlp => {
                let params = MlpParams {
                    hidden_layers: mlp_layers.to_vec(),
                    max_iter: self.config.mlp_max_iter,
                    seed,
                    ..MlpParams::default()
                };
                let mlp = MlpClassifier::fit(&x, &y, encoder.n_classes(), &params)?;
                if !mlp.converged() {
                    info!(
                        epochs = mlp.epochs_run(),
                        "MLP reached the iteration budget before the loss settled"
                    );
                }
                FittedModel::Mlp(mlp)
            }
            ModelKind::DecisionTree => {
                let params = RandomizedTreeParams {
                    seed,
                    ..RandomizedTreeParams::default()
                };
                FittedModel::DecisionTree(RandomizedTree::fit(
                    &x,
                    &y,
                    encoder.n_classes(),
                    &params,
                )?)
            }
            ModelKind::NaiveBayes => FittedModel::NaiveBayes(estimators::fit_naive_bayes(&x, &y)?),
        };

        Ok(ModelArtifact::new(encoder, model))
    }

    /// Score a fitted artifact against the held-out partition
    pub fn evaluate(
        &self,
        artifact: &ModelArtifact,
        test: &Dataset,
    ) -> Result<EvaluationReport, DomainError> {
        let predicted = artifact.predict_labels(&test.feature_rows())?;
        evaluate(&test.labels(), &predicted)
    }

    /// Split once, then fit, evaluate and save every requested kind
    ///
    /// A failure in one kind is recorded and the others still run.
    pub fn run(
        &self,
        dataset: &Dataset,
        kinds: &[ModelKind],
        store: &ArtifactStore,
    ) -> Result<TrainingRun, DomainError> {
        if kinds.is_empty() {
            return Err(DomainError::validation("No model kinds selected"));
        }

        let split = train_test_split(dataset, self.config.test_ratio, self.config.seed)?;
        let standalone = kinds.len() == 1;

        info!(
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            seed = self.config.seed,
            kinds = kinds.len(),
            "Starting training run"
        );

        let mut results = Vec::with_capacity(kinds.len());

        for &kind in kinds {
            let layers = self.mlp_layers(standalone);
            let result = self
                .fit(kind, &split.train, &layers)
                .and_then(|artifact| {
                    let report = self.evaluate(&artifact, &split.test)?;
                    let path = store.save(&artifact)?;
                    Ok(TrainingOutcome {
                        artifact,
                        report,
                        path,
                    })
                });

            match &result {
                Ok(outcome) => info!(
                    kind = %kind,
                    accuracy = outcome.report.accuracy,
                    path = %outcome.path.display(),
                    "Model trained"
                ),
                Err(e) => error!(kind = %kind, error = %e, "Training failed"),
            }

            results.push((kind, result));
        }

        let run = TrainingRun {
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            results,
        };

        if run.failed() > 0 {
            warn!(
                failed = run.failed(),
                succeeded = run.succeeded(),
                "Training run finished with failures"
            );
        }

        Ok(run)
    }
}
