//! Infrastructure layer - adapters for files, models and remote services

pub mod advisory;
pub mod analysis;
pub mod dataset;
pub mod logging;
pub mod ml;
pub mod services;
pub mod weather;
