//! Signup and login handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::AuthSession;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// User display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ann Example")]
    pub name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// User password
    #[schema(example = "secret1")]
    pub password: String,
}

/// Create signup/login routes (mounted under /users)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthSession),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthSession>)> {
    let session = state
        .auth_service
        .register(payload.name, payload.email, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Login and get a bearer token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthSession>> {
    let session = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(session))
}
