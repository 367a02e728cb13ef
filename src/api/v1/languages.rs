//! Supported languages and localized UI labels

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, LabelsResponse, LanguagesResponse};

/// GET /v1/languages
pub async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let kb = &state.knowledge_base;

    Json(LanguagesResponse {
        default: kb.default_language().to_string(),
        languages: kb.languages().to_vec(),
    })
}

/// GET /v1/languages/{language}/labels
pub async fn get_labels(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<Json<LabelsResponse>, ApiError> {
    let language = state.knowledge_base.resolve_language(&language)?;
    let labels = state.knowledge_base.labels(&language);

    Ok(Json(LabelsResponse { language, labels }))
}
