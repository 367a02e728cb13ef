//! Infrastructure services

mod prediction_service;
mod session_service;

pub use prediction_service::PredictionService;
pub use session_service::{SessionService, SessionStoreConfig};
