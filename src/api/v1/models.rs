//! Model listing

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{Json, ModelsResponse};

/// GET /v1/models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    let selectable = state.prediction_service.selectable_models();
    debug!(count = selectable.len(), "Listing selectable models");

    Json(ModelsResponse::new(&selectable))
}
