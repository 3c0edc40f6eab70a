//! Authentication service - registration, login, and token verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Identity returned after successful registration or login
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Id of the authenticated user
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: Uuid,
    /// Email the token is bound to
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// Signed bearer token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Authentication service trait for dependency injection.
///
/// Password hashing is handled by the [`Password`] value object.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue a token
    async fn register(&self, name: String, email: String, password: String)
        -> AppResult<AuthSession>;

    /// Login and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Verify a bearer token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Issue a token bound to the user's id and email
fn issue_session(user: &User, config: &Config) -> AppResult<AuthSession> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(AuthSession {
        user_id: user.id,
        email: user.email.clone(),
        token,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<AuthSession> {
        // Email format is validated by the handler's extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.uow.users().create(name, email, password_hash).await?;

        issue_session(&user, &self.config)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash when the user is unknown so valid
        // emails are not enumerable through response timing.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe: user_exists was checked above
        issue_session(user_result.as_ref().unwrap(), &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
