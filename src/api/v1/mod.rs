//! Versioned HTTP endpoints

pub mod analysis;
pub mod languages;
pub mod models;
pub mod predictions;
pub mod sessions;

use axum::{
    routing::{get, post, put},
    Router,
};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/models", get(models::list_models))
        .route("/languages", get(languages::list_languages))
        .route("/languages/{language}/labels", get(languages::get_labels))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", get(sessions::get_session))
        .route("/sessions/{id}/language", put(sessions::update_language))
        .route(
            "/sessions/{id}/weather/refresh",
            post(sessions::refresh_weather),
        )
        .route(
            "/sessions/{id}/predictions",
            post(predictions::create_prediction),
        )
        .route("/analysis/correlation", post(analysis::correlation))
}
