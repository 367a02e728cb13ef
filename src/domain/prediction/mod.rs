//! Prediction domain - one submission and its outcome

use serde::{Deserialize, Serialize};

use crate::domain::advisory::AdvisoryLookup;
use crate::domain::crop::{FeatureVector, ModelKind};

/// The seven inputs of one submission plus the selected model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub model: ModelKind,
}

impl PredictionRequest {
    pub fn new(features: FeatureVector, model: ModelKind) -> Self {
        Self { features, model }
    }
}

/// Predicted label and the advisory found for it
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutcome {
    pub label: String,
    pub model: ModelKind,
    pub language: String,
    pub advisory: AdvisoryLookup,
}

impl PredictionOutcome {
    pub fn advisory_unavailable(&self) -> bool {
        self.advisory.is_unavailable()
    }
}
