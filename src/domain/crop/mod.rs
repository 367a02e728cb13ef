//! Crop domain - feature schema, samples and model kinds

mod classifier;
mod features;
mod model_kind;

pub use classifier::CropClassifier;
pub use features::{Feature, FeatureVector, SampleRecord, FEATURE_COUNT, FEATURE_NAMES};
pub use model_kind::ModelKind;

#[cfg(test)]
pub use classifier::mock;
