//! Model registry - the selectable set of fitted classifiers

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::crop::{CropClassifier, ModelKind};
use crate::domain::DomainError;

/// Mapping from model kind to fitted classifier
///
/// Populated once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelKind, Arc<dyn CropClassifier>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used while loading
    pub fn with_model(mut self, model: Arc<dyn CropClassifier>) -> Self {
        self.models.insert(model.kind(), model);
        self
    }

    pub fn get(&self, kind: ModelKind) -> Option<Arc<dyn CropClassifier>> {
        self.models.get(&kind).cloned()
    }

    /// Look up a kind that callers derived from `selectable()`
    pub fn require(&self, kind: ModelKind) -> Result<Arc<dyn CropClassifier>, DomainError> {
        self.get(kind).ok_or_else(|| {
            DomainError::invalid_field(
                "model",
                format!("Model '{}' is not loaded", kind.display_name()),
            )
        })
    }

    pub fn contains(&self, kind: ModelKind) -> bool {
        self.models.contains_key(&kind)
    }

    /// Kinds available for selection, in presentation order
    pub fn selectable(&self) -> Vec<ModelKind> {
        ModelKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crop::mock::MockClassifier;

    #[test]
    fn test_selectable_only_contains_loaded_kinds() {
        let registry = ModelRegistry::new()
            .with_model(Arc::new(MockClassifier::new(ModelKind::NaiveBayes, "rice")))
            .with_model(Arc::new(MockClassifier::new(ModelKind::RandomForest, "rice")));

        assert_eq!(
            registry.selectable(),
            vec![ModelKind::RandomForest, ModelKind::NaiveBayes]
        );
        assert!(!registry.contains(ModelKind::Mlp));
        assert!(registry.require(ModelKind::DecisionTree).is_err());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.selectable().is_empty());
    }
}
