//! Prediction and advisory pipeline

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::crop::ModelKind;
use crate::domain::{
    DomainError, KnowledgeBase, ModelRegistry, PredictionOutcome, PredictionRequest, Session,
};

/// Runs one submission against the registry and the knowledge base
#[derive(Debug, Clone)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    knowledge_base: Arc<KnowledgeBase>,
}

impl PredictionService {
    /// Refuses an empty registry, so no prediction can ever run without a model
    pub fn new(
        registry: Arc<ModelRegistry>,
        knowledge_base: Arc<KnowledgeBase>,
    ) -> Result<Self, DomainError> {
        if registry.is_empty() {
            return Err(DomainError::configuration(
                "No models available, predictions are disabled",
            ));
        }

        Ok(Self {
            registry,
            knowledge_base,
        })
    }

    pub fn selectable_models(&self) -> Vec<ModelKind> {
        self.registry.selectable()
    }

    /// Validate the inputs, predict a label and look up its advice
    pub fn predict(
        &self,
        session: &Session,
        request: &PredictionRequest,
    ) -> Result<PredictionOutcome, DomainError> {
        request.features.validate()?;

        let model = self.registry.require(request.model)?;
        let label = model.predict(&request.features)?;

        let advisory = self.knowledge_base.lookup(&label, session.language());
        if advisory.is_unavailable() {
            warn!(label = %label, language = %session.language(), "No advisory entry for predicted crop");
        }

        debug!(
            session_id = %session.id(),
            model = %request.model,
            label = %label,
            "Prediction completed"
        );

        Ok(PredictionOutcome {
            label,
            model: request.model,
            language: session.language().to_string(),
            advisory,
        })
    }
}
