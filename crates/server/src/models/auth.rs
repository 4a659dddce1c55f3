use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Admin login request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    /// Bearer token for protected endpoints
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
