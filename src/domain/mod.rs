//! Domain layer - pure types, invariants and provider seams

pub mod advisory;
pub mod crop;
pub mod error;
pub mod prediction;
pub mod registry;
pub mod session;
pub mod weather;

pub use advisory::{AdvisoryLookup, KnowledgeBase, LocalizedAdvice};
pub use crop::{CropClassifier, Feature, FeatureVector, ModelKind, SampleRecord};
pub use error::DomainError;
pub use prediction::{PredictionOutcome, PredictionRequest};
pub use registry::ModelRegistry;
pub use session::{Session, SessionId};
pub use weather::{WeatherSnapshot, SnapshotSource};
