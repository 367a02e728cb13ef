//! Session lifecycle, language switching and manual weather refresh

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::debug;

use crate::api::middleware::ClientIp;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateSessionRequest, Json, RefreshWeatherRequest, SessionResponse,
    UpdateLanguageRequest,
};
use crate::domain::SessionId;

/// POST /v1/sessions
///
/// The body is optional; an empty body starts a session in the default language.
pub async fn create_session(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))?
    };

    debug!(client_ip = ?client_ip, "Creating session");

    let session = state
        .session_service
        .create(client_ip, request.language.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from_session(&session))))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session_service.get(SessionId::parse(&id)?).await?;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// PUT /v1/sessions/{id}/language
pub async fn update_language(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLanguageRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .session_service
        .set_language(SessionId::parse(&id)?, &request.language)
        .await?;

    Ok(Json(SessionResponse::from_session(&session)))
}

/// POST /v1/sessions/{id}/weather/refresh
pub async fn refresh_weather(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RefreshWeatherRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .session_service
        .refresh_weather(SessionId::parse(&id)?, &request.city)
        .await?;

    Ok(Json(SessionResponse::from_session(&session)))
}
