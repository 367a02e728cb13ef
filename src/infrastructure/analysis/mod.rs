//! Ad-hoc analysis of uploaded tabular data

pub mod correlation;

pub use correlation::{analyze_csv, CorrelationReport, DEFAULT_PREVIEW_ROWS};
