//! Serialized model artifacts and the slots they live in

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::estimators::{self, BayesModel, ForestModel};
use super::{LabelEncoder, MlpClassifier, RandomizedTree};
use crate::domain::crop::{CropClassifier, FeatureVector, ModelKind, FEATURE_NAMES};
use crate::domain::DomainError;

/// Bumped whenever the encoded layout changes
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// The fitted estimator inside an artifact
#[derive(Serialize, Deserialize)]
pub enum FittedModel {
    RandomForest(ForestModel),
    Mlp(MlpClassifier),
    DecisionTree(RandomizedTree),
    NaiveBayes(BayesModel),
}

impl FittedModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::RandomForest(_) => ModelKind::RandomForest,
            Self::Mlp(_) => ModelKind::Mlp,
            Self::DecisionTree(_) => ModelKind::DecisionTree,
            Self::NaiveBayes(_) => ModelKind::NaiveBayes,
        }
    }

    pub fn predict_ids(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        match self {
            Self::RandomForest(m) => estimators::predict_random_forest(m, rows),
            Self::Mlp(m) => m.predict(rows),
            Self::DecisionTree(m) => m.predict(rows),
            Self::NaiveBayes(m) => estimators::predict_naive_bayes(m, rows),
        }
    }
}

impl fmt::Debug for FittedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FittedModel::{:?}", self.kind())
    }
}

/// A fitted model plus the schema and vocabulary it was trained with
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    version: u32,
    kind: ModelKind,
    feature_names: Vec<String>,
    encoder: LabelEncoder,
    trained_at: DateTime<Utc>,
    model: FittedModel,
}

impl ModelArtifact {
    pub fn new(encoder: LabelEncoder, model: FittedModel) -> Self {
        Self {
            version: ARTIFACT_FORMAT_VERSION,
            kind: model.kind(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            encoder,
            trained_at: Utc::now(),
            model,
        }
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Check the artifact matches the slot it was read from and the current schema
    pub fn validate_for(&self, slot: ModelKind) -> Result<(), DomainError> {
        if self.version != ARTIFACT_FORMAT_VERSION {
            return Err(DomainError::configuration(format!(
                "Artifact '{}' has format version {}, expected {}",
                slot.slot_name(),
                self.version,
                ARTIFACT_FORMAT_VERSION
            )));
        }

        if self.kind != slot || self.model.kind() != slot {
            return Err(DomainError::configuration(format!(
                "Artifact '{}' holds a {} model",
                slot.slot_name(),
                self.kind.display_name()
            )));
        }

        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(DomainError::configuration(format!(
                "Artifact '{}' was fit on features [{}], expected [{}]",
                slot.slot_name(),
                self.feature_names.join(", "),
                FEATURE_NAMES.join(", ")
            )));
        }

        Ok(())
    }

    /// Text rendering of the decision rules, for tree models only
    pub fn decision_rules(&self) -> Option<String> {
        match &self.model {
            FittedModel::DecisionTree(tree) => {
                Some(tree.export_rules(&self.feature_names, self.encoder.classes()))
            }
            _ => None,
        }
    }

    /// Predict labels for many rows in canonical feature order
    pub fn predict_labels(&self, rows: &[Vec<f64>]) -> Result<Vec<String>, DomainError> {
        self.model
            .predict_ids(rows)?
            .into_iter()
            .map(|id| self.encoder.decode(id).map(str::to_string))
            .collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| DomainError::serialization(format!("Failed to encode artifact: {}", e)))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        let (artifact, _) = bincode::serde::decode_from_slice(bytes, bincode::config::standard())
            .map_err(|e| DomainError::serialization(format!("Failed to decode artifact: {}", e)))?;
        Ok(artifact)
    }
}

impl CropClassifier for ModelArtifact {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    fn predict(&self, features: &FeatureVector) -> Result<String, DomainError> {
        self.predict_labels(&[features.to_array().to_vec()])?
            .pop()
            .ok_or_else(|| DomainError::model("Model returned no prediction"))
    }
}

/// Directory holding one artifact file per model kind
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, kind: ModelKind) -> PathBuf {
        self.dir.join(kind.slot_name())
    }

    /// Write an artifact to its slot, replacing whatever was there
    pub fn save(&self, artifact: &ModelArtifact) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            DomainError::internal(format!(
                "Cannot create artifact directory '{}': {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.slot_path(artifact.kind);
        let bytes = artifact.to_bytes()?;

        std::fs::write(&path, &bytes).map_err(|e| {
            DomainError::internal(format!("Cannot write artifact '{}': {}", path.display(), e))
        })?;

        info!(
            kind = %artifact.kind,
            path = %path.display(),
            bytes = bytes.len(),
            "Model artifact saved"
        );

        Ok(path)
    }

    /// Read a slot; `Ok(None)` when no artifact exists there
    pub fn load(&self, kind: ModelKind) -> Result<Option<ModelArtifact>, DomainError> {
        let path = self.slot_path(kind);

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(DomainError::configuration(format!(
                    "Cannot read artifact '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        let artifact = ModelArtifact::from_bytes(&bytes).map_err(|e| {
            DomainError::configuration(format!("Artifact '{}' is unreadable: {}", path.display(), e))
        })?;
        artifact.validate_for(kind)?;

        debug!(kind = %kind, path = %path.display(), "Model artifact read");
        Ok(Some(artifact))
    }
}
