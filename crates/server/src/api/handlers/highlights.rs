use axum::{extract::State, Json};
use serde_json::Value;

use crate::api::{AdminSession, ApiJson};
use crate::error::{AppResult, ErrorResponse};
use crate::models::Slide;
use crate::state::AppState;

/// Get the carousel slides
#[utoipa::path(
    get,
    path = "/api/destaques",
    tag = "destaques",
    responses(
        (status = 200, description = "Slides in display order", body = Vec<Slide>)
    )
)]
pub async fn get_highlights(State(state): State<AppState>) -> AppResult<Json<Vec<Slide>>> {
    let slides = state.highlights.get().await?;
    Ok(Json(slides))
}

/// Replace the carousel slides
///
/// The body must be a JSON array; the stored sequence is replaced as a whole.
#[utoipa::path(
    post,
    path = "/api/destaques",
    tag = "destaques",
    security(("bearer" = [])),
    request_body = Vec<Slide>,
    responses(
        (status = 200, description = "Slides saved", body = Vec<Slide>),
        (status = 400, description = "Body is not a list of slides", body = ErrorResponse),
        (status = 401, description = "Missing session token", body = ErrorResponse)
    )
)]
pub async fn replace_highlights(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Value>,
) -> AppResult<Json<Vec<Slide>>> {
    let slides = state.highlights.replace(payload).await?;
    Ok(Json(slides))
}
