use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::ValidationError;
use crate::services::{AuthError, HighlightError, SongError};

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Wrong username or password
    #[error("Usuário ou senha inválidos.")]
    AuthenticationFailed,

    /// Protected route called without a session token
    #[error("Autenticação necessária.")]
    AuthorizationRequired,

    /// Session token is garbled, expired or signed with another key
    #[error("Token inválido ou expirado.")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "Erro interno do servidor.";

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthenticationFailed | AppError::AuthorizationRequired => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::AuthenticationFailed => "authentication_failed",
            AppError::AuthorizationRequired => "authorization_required",
            AppError::InvalidToken => "invalid_token",
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            code: self.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.0)
    }
}

impl From<SongError> for AppError {
    fn from(e: SongError) -> Self {
        match e {
            SongError::Validation(e) => e.into(),
            SongError::NotFound(_) => AppError::NotFound(e.to_string()),
            SongError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<HighlightError> for AppError {
    fn from(e: HighlightError) -> Self {
        match e {
            HighlightError::Validation(e) => e.into(),
            HighlightError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::AuthenticationFailed,
            AuthError::MissingToken => AppError::AuthorizationRequired,
            AuthError::InvalidToken(_) | AuthError::WrongSubject => {
                tracing::warn!("Rejected session token: {}", e);
                AppError::InvalidToken
            }
            AuthError::Hash(_) | AuthError::Signing(_) | AuthError::Join(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(format!("Identificador inválido: {}", rejection.body_text()))
    }
}
