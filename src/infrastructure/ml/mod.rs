//! Classifier implementations, artifacts and the training pipeline

pub mod artifact;
pub mod estimators;
pub mod label_encoder;
pub mod loader;
pub mod metrics;
pub mod mlp;
pub mod randomized_tree;
pub mod trainer;

pub use artifact::{ArtifactStore, FittedModel, ModelArtifact, ARTIFACT_FORMAT_VERSION};
pub use label_encoder::LabelEncoder;
pub use loader::load_registry;
pub use metrics::{evaluate, EvaluationReport};
pub use mlp::{MlpClassifier, MlpParams};
pub use randomized_tree::{RandomizedTree, RandomizedTreeParams};
pub use trainer::{Trainer, TrainingConfig, TrainingOutcome, TrainingRun};
