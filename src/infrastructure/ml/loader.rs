use std::sync::Arc;

use tracing::{info, warn};

use super::ArtifactStore;
use crate::domain::crop::{CropClassifier, ModelKind};
use crate::domain::{DomainError, ModelRegistry};

/// Read every artifact slot into a registry
///
/// Missing slots are skipped with a warning. Unreadable or mismatched artifacts
/// and an empty result are configuration errors.
pub fn load_registry(store: &ArtifactStore) -> Result<ModelRegistry, DomainError> {
    let mut registry = ModelRegistry::new();

    for kind in ModelKind::ALL {
        match store.load(kind)? {
            Some(artifact) => {
                info!(
                    kind = %kind,
                    classes = artifact.classes().len(),
                    trained_at = %artifact.trained_at(),
                    "Model loaded"
                );
                registry = registry.with_model(Arc::new(artifact));
            }
            None => warn!(
                kind = %kind,
                slot = %store.slot_path(kind).display(),
                "Model artifact missing, model will not be selectable"
            ),
        }
    }

    if registry.is_empty() {
        return Err(DomainError::configuration(format!(
            "No models available in '{}'; run `cropify train` first",
            store.dir().display()
        )));
    }

    info!(models = registry.len(), "Model registry ready");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ml::trainer::fixtures::synthetic_dataset;
    use crate::infrastructure::ml::{Trainer, TrainingConfig};

    fn temp_store() -> ArtifactStore {
        ArtifactStore::new(
            std::env::temp_dir().join(format!("cropify-registry-{}", uuid::Uuid::new_v4())),
        )
    }

    #[test]
    fn test_empty_store_is_fatal() {
        let err = load_registry(&temp_store()).unwrap_err();
        assert!(err.to_string().contains("No models available"));
    }

    #[test]
    fn test_partial_store_exposes_only_saved_kinds() {
        let store = temp_store();
        let trainer = Trainer::new(TrainingConfig {
            rf_trees: 5,
            ..TrainingConfig::default()
        });
        let dataset = synthetic_dataset(10);

        for kind in [ModelKind::NaiveBayes, ModelKind::DecisionTree] {
            let artifact = trainer.fit(kind, &dataset, &[]).unwrap();
            store.save(&artifact).unwrap();
        }

        let registry = load_registry(&store).unwrap();
        assert_eq!(
            registry.selectable(),
            vec![ModelKind::NaiveBayes, ModelKind::DecisionTree]
        );
        assert!(!registry.contains(ModelKind::RandomForest));
        assert!(!registry.contains(ModelKind::Mlp));

        std::fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_corrupt_slot_is_fatal() {
        let store = temp_store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.slot_path(ModelKind::Mlp), b"not an artifact").unwrap();

        let err = load_registry(&store).unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));

        std::fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn test_artifact_in_wrong_slot_is_fatal() {
        let store = temp_store();
        let trainer = Trainer::new(TrainingConfig::default());
        let artifact = trainer
            .fit(ModelKind::NaiveBayes, &synthetic_dataset(5), &[])
            .unwrap();
        let path = store.save(&artifact).unwrap();
        std::fs::rename(&path, store.slot_path(ModelKind::RandomForest)).unwrap();

        let err = load_registry(&store).unwrap_err();
        assert!(err.to_string().contains("random_forest.bin"));

        std::fs::remove_dir_all(store.dir()).ok();
    }
}
