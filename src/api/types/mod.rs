//! Request and response types of the HTTP surface

pub mod error;
pub mod json;
pub mod language;
pub mod models;
pub mod prediction;
pub mod session;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use language::{LabelsResponse, LanguagesResponse};
pub use models::{ModelInfo, ModelsResponse};
pub use prediction::{PredictRequest, PredictResponse};
pub use session::{
    CreateSessionRequest, FieldSpec, RefreshWeatherRequest, SessionResponse, UpdateLanguageRequest,
};
