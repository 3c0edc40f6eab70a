//! Runtime configuration, read once from the environment at startup.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_UPLOAD_DIR, MIN_JWT_SECRET_LENGTH,
};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: String,
}

// Secrets stay out of logs even at debug level.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("upload_dir", &self.upload_dir)
            .finish()
    }
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// # Panics
    /// Panics if JWT_SECRET is missing outside debug builds, or shorter
    /// than [`MIN_JWT_SECRET_LENGTH`].
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            jwt_secret: load_jwt_secret(),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            upload_dir: env_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
        }
    }

    /// Fixed configuration for unit tests.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "unit-test-secret-key-at-least-32-chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            upload_dir: DEFAULT_UPLOAD_DIR.to_string(),
        }
    }

    /// Key material for token signing and verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn load_jwt_secret() -> String {
    let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("JWT_SECRET not set, using insecure default for development");
            "dev-secret-key-minimum-32-chars!!".to_string()
        } else {
            panic!("JWT_SECRET environment variable must be set in production");
        }
    });

    assert!(
        secret.len() >= MIN_JWT_SECRET_LENGTH,
        "JWT_SECRET must be at least {} characters long",
        MIN_JWT_SECRET_LENGTH
    );

    secret
}
