//! Prediction endpoint

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequest, PredictResponse};
use crate::domain::{ModelKind, PredictionRequest, SessionId};

/// POST /v1/sessions/{id}/predictions
pub async fn create_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let session = state.session_service.get(SessionId::parse(&id)?).await?;
    let model: ModelKind = request.model.parse()?;

    let outcome = state
        .prediction_service
        .predict(&session, &PredictionRequest::new(request.features, model))?;

    Ok(Json(PredictResponse::from(outcome)))
}
