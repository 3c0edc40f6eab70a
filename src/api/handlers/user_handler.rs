//! User handlers.

use axum::{
    extract::{Multipart, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::store_uploaded_image;
use crate::api::extractors::{format_validation_errors, MultipartForm};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::release_image;

/// Multipart fields accepted when updating a profile
#[derive(Debug, Validate, ToSchema)]
pub struct UpdateProfileForm {
    /// New display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ann Example")]
    pub name: String,
}

/// Response envelope for a single user
#[derive(Debug, Serialize, ToSchema)]
pub struct UserBody {
    pub user: UserResponse,
}

/// Response envelope for a list of users
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersBody {
    pub users: Vec<UserResponse>,
}

/// Create user routes (mounted under /users, besides signup/login)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id", get(get_user).patch(update_user))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All registered users", body = UsersBody)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<UsersBody>> {
    let users = state.user_service.list_users().await?;

    Ok(Json(UsersBody {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user", body = UserBody),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserBody>> {
    let user = state.user_service.get_user(user_id).await?;

    Ok(Json(UserBody {
        user: UserResponse::from(user),
    }))
}

/// Update a user's name and, optionally, profile image
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User ID")),
    request_body(content = UpdateProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User updated", body = UserBody),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<UserBody>> {
    let form = MultipartForm::parse(&mut multipart).await?;

    let fields = UpdateProfileForm {
        name: form.text("name")?.to_owned(),
    };
    fields
        .validate()
        .map_err(|e| crate::errors::AppError::validation(format_validation_errors(&e)))?;

    let image = match form.image {
        Some(image) => Some(store_uploaded_image(state.files.as_ref(), image).await?),
        None => None,
    };

    let user = match state
        .user_service
        .update_profile(user_id, fields.name, image.clone())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            if let Some(reference) = image.as_deref() {
                release_image(state.files.as_ref(), reference).await;
            }
            return Err(e);
        }
    };

    Ok(Json(UserBody {
        user: UserResponse::from(user),
    }))
}
