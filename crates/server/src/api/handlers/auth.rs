use axum::{extract::State, Json};

use crate::api::ApiJson;
use crate::error::{AppResult, ErrorResponse};
use crate::models::{LoginRequest, LoginResponse};
use crate::state::AppState;

/// Admin login
///
/// Returns a bearer token valid for one hour.
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.auth.login(payload).await?;
    Ok(Json(response))
}
