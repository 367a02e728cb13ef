//! Train command - fits the classifiers and writes their artifacts

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::ModelKind;
use crate::infrastructure::dataset::load_dataset;
use crate::infrastructure::ml::{ArtifactStore, Trainer, TrainingRun};

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Dataset CSV (overrides dataset.path)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Name of the crop label column (overrides dataset.label_column)
    #[arg(long)]
    pub label_column: Option<String>,

    /// Directory the artifact slots live in (overrides artifacts.dir)
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// `all`, or a comma-separated list such as `random_forest,mlp`
    #[arg(long, default_value = "all")]
    pub kind: String,

    /// Number of trees in the random forest
    #[arg(long)]
    pub trees: Option<u16>,

    /// MLP hidden layer sizes for a standalone MLP run, e.g. `100,50`
    #[arg(long, value_delimiter = ',')]
    pub hidden_layers: Option<Vec<usize>>,

    /// MLP epoch budget
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Seed for the split and every estimator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Held-out fraction of the dataset
    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// Print the random tree's decision rules after fitting
    #[arg(long)]
    pub print_rules: bool,
}

impl TrainArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.dataset {
            config.dataset.path = path.clone();
        }
        if let Some(column) = &self.label_column {
            config.dataset.label_column = column.clone();
        }
        if let Some(dir) = &self.artifacts_dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(trees) = self.trees {
            config.training.rf_trees = trees;
        }
        if let Some(layers) = &self.hidden_layers {
            config.training.mlp_hidden_layers = layers.clone();
        }
        if let Some(max_iter) = self.max_iter {
            config.training.mlp_max_iter = max_iter;
        }
        if let Some(seed) = self.seed {
            config.training.seed = seed;
        }
        if let Some(ratio) = self.test_ratio {
            config.training.test_ratio = ratio;
        }
    }
}

/// `all` or a comma-separated list of kinds, without duplicates
pub fn parse_kinds(value: &str) -> anyhow::Result<Vec<ModelKind>> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(ModelKind::ALL.to_vec());
    }

    let mut kinds = Vec::new();
    for part in value.split(',').filter(|p| !p.trim().is_empty()) {
        let kind: ModelKind = part.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    anyhow::ensure!(!kinds.is_empty(), "no model kind given in '{}'", value);
    Ok(kinds)
}

pub async fn run(args: TrainArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    super::serve::init_logging(&config);
    config.validate()?;

    let kinds = parse_kinds(&args.kind)?;

    let dataset = load_dataset(&config.dataset.path, &config.dataset.label_column)
        .with_context(|| format!("loading dataset '{}'", config.dataset.path.display()))?;

    let trainer = Trainer::new(config.training.to_training_config());
    let store = ArtifactStore::new(&config.artifacts.dir);

    // fitting is CPU bound
    let run = tokio::task::spawn_blocking(move || trainer.run(&dataset, &kinds, &store)).await??;

    print_run(&run, args.print_rules);

    info!(
        succeeded = run.succeeded(),
        failed = run.failed(),
        "Training finished"
    );

    anyhow::ensure!(
        run.failed() == 0,
        "{} of {} model(s) failed to train",
        run.failed(),
        run.results.len()
    );

    Ok(())
}

fn print_run(run: &TrainingRun, print_rules: bool) {
    println!(
        "Split: {} training rows, {} held-out rows\n",
        run.train_rows, run.test_rows
    );

    for (kind, result) in &run.results {
        println!("=== {} ===", kind.display_name());

        match result {
            Ok(outcome) => {
                println!("Accuracy: {:.4}", outcome.report.accuracy);
                println!("{}", outcome.report);
                println!("Saved to {}\n", outcome.path.display());

                if print_rules {
                    if let Some(rules) = outcome.artifact.decision_rules() {
                        println!("Decision rules:\n{}", rules);
                    }
                }
            }
            Err(e) => println!("FAILED: {}\n", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds_all() {
        assert_eq!(parse_kinds("all").unwrap(), ModelKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_kinds_list_dedups() {
        assert_eq!(
            parse_kinds("mlp, nb,mlp").unwrap(),
            vec![ModelKind::Mlp, ModelKind::NaiveBayes]
        );
    }

    #[test]
    fn test_parse_kinds_rejects_unknown() {
        assert!(parse_kinds("svm").is_err());
        assert!(parse_kinds(" , ").is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = TrainArgs {
            dataset: Some(PathBuf::from("other.csv")),
            label_column: Some("Crop".to_string()),
            artifacts_dir: None,
            kind: "all".to_string(),
            trees: Some(10),
            hidden_layers: None,
            max_iter: None,
            seed: Some(7),
            test_ratio: None,
            print_rules: false,
        };
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.dataset.label_column, "Crop");
        assert_eq!(config.training.rf_trees, 10);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.artifacts.dir, PathBuf::from("models"));
    }
}
