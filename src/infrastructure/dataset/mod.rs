//! Dataset loading and deterministic train/test splitting

mod loader;
mod split;

pub use loader::{load_dataset, Dataset};
pub use split::{train_test_split, DatasetSplit};
