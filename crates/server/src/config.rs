use rand::{distr::Alphanumeric, Rng};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// bcrypt cost used when hashing a plaintext password supplied at startup
const STARTUP_HASH_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Failed to hash admin password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            _ => Self::Dev,
        }
    }

    /// Returns the default data path for this environment
    pub fn default_data_path(&self) -> PathBuf {
        match self {
            Self::Dev => PathBuf::from("./data"),
            Self::Prod => PathBuf::from("/data"),
        }
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Static admin credential and token signing settings
#[derive(Clone)]
pub struct AuthConfig {
    pub admin_user: String,
    /// bcrypt hash of the admin password
    pub admin_password_hash: String,
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_user", &self.admin_user)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub data_path: PathBuf,
    pub database_url: String,
    pub max_connections: u32,
    pub static_dir: PathBuf,
    pub auth: AuthConfig,
}

impl Config {
    pub fn new(env: Environment, data_path: impl AsRef<Path>, auth: AuthConfig) -> Self {
        let data_path = data_path.as_ref().to_path_buf();
        let database_url = format!(
            "sqlite:{}?mode=rwc",
            data_path.join("biblioteca.db").display()
        );
        Self {
            env,
            data_path,
            database_url,
            max_connections: 5,
            static_dir: PathBuf::from("./dist"),
            auth,
        }
    }

    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_str(&env::var("APP_ENV").unwrap_or_default());
        let data_path = var("DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| env.default_data_path());

        let auth = AuthConfig::from_env(env)?;
        let mut config = Self::new(env, data_path, auth);

        if let Some(url) = var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(dir) = var("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(max) = var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = max.parse().map_err(|e| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                reason: format!("{}", e),
            })?;
        }

        Ok(config)
    }
}

impl AuthConfig {
    /// Default session lifetime: one hour
    pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let admin_user = var("ADMIN_USER").ok_or(ConfigError::Missing("ADMIN_USER"))?;

        let admin_password_hash = match var("ADMIN_PASSWORD_HASHED") {
            Some(hash) => check_hash(hash)?,
            None => {
                let plain =
                    var("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD_HASHED"))?;
                tracing::warn!(
                    "ADMIN_PASSWORD_HASHED not set, hashing plaintext ADMIN_PASSWORD at startup"
                );
                bcrypt::hash(plain, STARTUP_HASH_COST)?
            }
        };

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if env.is_prod() => return Err(ConfigError::Missing("JWT_SECRET")),
            None => {
                tracing::warn!(
                    "JWT_SECRET not set, using a random secret; sessions will not survive restarts"
                );
                rand::rng()
                    .sample_iter(&Alphanumeric)
                    .take(48)
                    .map(char::from)
                    .collect()
            }
        };

        Ok(Self {
            admin_user,
            admin_password_hash,
            jwt_secret,
            token_ttl_secs: Self::DEFAULT_TOKEN_TTL_SECS,
        })
    }
}

/// Reject a configured hash that bcrypt cannot parse
fn check_hash(hash: String) -> Result<String, ConfigError> {
    bcrypt::verify("", &hash).map_err(|e| ConfigError::Invalid {
        key: "ADMIN_PASSWORD_HASHED",
        reason: e.to_string(),
    })?;
    Ok(hash)
}

/// Read a non-empty environment variable
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str("production"), Environment::Prod);
        assert_eq!(Environment::from_str("PROD"), Environment::Prod);
        assert_eq!(Environment::from_str(""), Environment::Dev);
        assert_eq!(Environment::from_str("staging"), Environment::Dev);
    }

    #[test]
    fn test_database_url_follows_data_path() {
        let auth = AuthConfig {
            admin_user: "admin".to_string(),
            admin_password_hash: String::new(),
            jwt_secret: "secret".to_string(),
            token_ttl_secs: AuthConfig::DEFAULT_TOKEN_TTL_SECS,
        };
        let config = Config::new(Environment::Dev, "/tmp/biblioteca", auth);
        assert_eq!(
            config.database_url,
            "sqlite:/tmp/biblioteca/biblioteca.db?mode=rwc"
        );
    }

    #[test]
    fn test_malformed_password_hash_rejected() {
        assert!(matches!(
            check_hash("not-a-bcrypt-hash".to_string()),
            Err(ConfigError::Invalid {
                key: "ADMIN_PASSWORD_HASHED",
                ..
            })
        ));

        let hash = bcrypt::hash("s3nha", 4).unwrap();
        assert_eq!(check_hash(hash.clone()).unwrap(), hash);
    }

    #[test]
    fn test_auth_debug_hides_secrets() {
        let auth = AuthConfig {
            admin_user: "admin".to_string(),
            admin_password_hash: "$2b$hash".to_string(),
            jwt_secret: "top-secret".to_string(),
            token_ttl_secs: 60,
        };
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("top-secret"));
        assert!(!debug.contains("$2b$hash"));
    }
}
