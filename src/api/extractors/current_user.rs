//! Authenticated-identity extractor.
//!
//! Handlers that require authentication take a [`CurrentUser`] parameter;
//! extraction verifies the bearer token before the handler body runs.

use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Verified identity extracted from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix(BEARER_TOKEN_PREFIX)
            .ok_or(AppError::Unauthorized)?;

        let claims = state.auth_service.verify_token(token)?;

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
