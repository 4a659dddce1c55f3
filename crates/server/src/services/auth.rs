use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::models::{Claims, LoginRequest, LoginResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Usuário ou senha inválidos.")]
    InvalidCredentials,
    #[error("Token de acesso ausente.")]
    MissingToken,
    #[error("Token inválido ou expirado: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("Token pertence a outro usuário.")]
    WrongSubject,
    #[error("Password verification failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Password verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Admin login and session token verification
pub struct AuthService {
    admin_user: String,
    admin_password_hash: String,
    token_ttl_secs: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            admin_user: config.admin_user.clone(),
            admin_password_hash: config.admin_password_hash.clone(),
            token_ttl_secs: config.token_ttl_secs,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check the credential and issue a session token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        // bcrypt runs on the blocking pool, for every attempt
        let hash = self.admin_password_hash.clone();
        let password = request.password;
        let password_ok =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

        if request.username != self.admin_user {
            tracing::warn!("Login failed for unknown user {}", request.username);
            return Err(AuthError::InvalidCredentials);
        }
        if !password_ok {
            tracing::warn!("Login failed for {}: wrong password", self.admin_user);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token()?;
        tracing::info!("Admin {} logged in", self.admin_user);

        Ok(LoginResponse {
            success: true,
            token,
            expires_in: self.token_ttl_secs,
        })
    }

    fn issue_token(&self) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: self.admin_user.clone(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(AuthError::Signing)
    }

    /// Validate signature and expiry of a session token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::InvalidToken)?;

        if data.claims.sub != self.admin_user {
            return Err(AuthError::WrongSubject);
        }
        Ok(data.claims)
    }
}
