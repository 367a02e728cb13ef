use std::fmt::Debug;

use super::{FeatureVector, ModelKind};
use crate::domain::DomainError;

/// A fitted crop classifier
///
/// Implementations are immutable once loaded and are shared across sessions.
pub trait CropClassifier: Send + Sync + Debug {
    /// Family this classifier belongs to
    fn kind(&self) -> ModelKind;

    /// Label vocabulary seen during training, sorted
    fn classes(&self) -> &[String];

    /// Predict a crop label for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<String, DomainError>;
}
