//! Place handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::store_uploaded_image;
use crate::api::extractors::{format_validation_errors, CurrentUser, MultipartForm};
use crate::api::AppState;
use crate::domain::{Location, NewPlace, PlaceChanges, PlaceResponse};
use crate::errors::AppResult;
use crate::services::release_image;
use crate::types::MessageResponse;

/// Multipart fields accepted when creating a place
#[derive(Debug, Validate, ToSchema)]
pub struct CreatePlaceForm {
    /// Place title
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Empire State Building")]
    pub title: String,
    /// Longer description of the place
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
    /// Postal address
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    /// Latitude
    #[schema(example = 40.7484)]
    pub lat: f64,
    /// Longitude
    #[schema(example = -73.9857)]
    pub lng: f64,
}

/// Multipart fields accepted when updating a place
#[derive(Debug, Validate, ToSchema)]
pub struct UpdatePlaceForm {
    /// Place title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Longer description of the place
    #[validate(length(min = 5, message = "Description must be at least 5 characters"))]
    pub description: String,
    /// Postal address
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

/// Response envelope for a single place
#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceBody {
    pub place: PlaceResponse,
}

/// Response envelope for a list of places
#[derive(Debug, Serialize, ToSchema)]
pub struct PlacesBody {
    pub places: Vec<PlaceResponse>,
}

/// Create place routes (mounted under /places)
pub fn place_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_place))
        .route("/user/:user_id", get(list_user_places))
        .route(
            "/:place_id",
            get(get_place).patch(update_place).delete(delete_place),
        )
}

/// Get a place by id
#[utoipa::path(
    get,
    path = "/places/{place_id}",
    tag = "Places",
    params(("place_id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "The place", body = PlaceBody),
        (status = 404, description = "Place not found")
    )
)]
pub async fn get_place(
    State(state): State<AppState>,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<PlaceBody>> {
    let place = state.place_service.get_place(place_id).await?;

    Ok(Json(PlaceBody {
        place: PlaceResponse::from(place),
    }))
}

/// List the places a user created; an empty list is a normal response
#[utoipa::path(
    get,
    path = "/places/user/{user_id}",
    tag = "Places",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Places created by the user", body = PlacesBody)
    )
)]
pub async fn list_user_places(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<PlacesBody>> {
    let places = state.place_service.list_by_creator(user_id).await?;

    Ok(Json(PlacesBody {
        places: places.into_iter().map(PlaceResponse::from).collect(),
    }))
}

/// Create a place owned by the authenticated user
#[utoipa::path(
    post,
    path = "/places",
    tag = "Places",
    security(("bearer_auth" = [])),
    request_body(content = CreatePlaceForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Place created", body = PlaceBody),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Creator account not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_place(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<PlaceBody>)> {
    let form = MultipartForm::parse(&mut multipart).await?;

    let fields = CreatePlaceForm {
        title: form.text("title")?.to_owned(),
        description: form.text("description")?.to_owned(),
        address: form.text("address")?.to_owned(),
        lat: form.parsed("lat")?,
        lng: form.parsed("lng")?,
    };
    fields
        .validate()
        .map_err(|e| crate::errors::AppError::validation(format_validation_errors(&e)))?;

    let image_url = match form.image {
        Some(image) => Some(store_uploaded_image(state.files.as_ref(), image).await?),
        None => None,
    };

    let input = NewPlace {
        title: fields.title,
        description: fields.description,
        address: fields.address,
        location: Location {
            lat: fields.lat,
            lng: fields.lng,
        },
        image_url: image_url.clone(),
    };

    let place = match state.place_service.create_place(user.id, input).await {
        Ok(place) => place,
        Err(e) => {
            // The place was never persisted, so the stored file is orphaned
            if let Some(reference) = image_url.as_deref() {
                release_image(state.files.as_ref(), reference).await;
            }
            return Err(e);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(PlaceBody {
            place: PlaceResponse::from(place),
        }),
    ))
}

/// Update a place; only its creator may do so
#[utoipa::path(
    patch,
    path = "/places/{place_id}",
    tag = "Places",
    security(("bearer_auth" = [])),
    params(("place_id" = Uuid, Path, description = "Place ID")),
    request_body(content = UpdatePlaceForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Place updated", body = PlaceBody),
        (status = 401, description = "Unauthorized or not the creator"),
        (status = 404, description = "Place not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_place(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(place_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<PlaceBody>> {
    let form = MultipartForm::parse(&mut multipart).await?;

    let fields = UpdatePlaceForm {
        title: form.text("title")?.to_owned(),
        description: form.text("description")?.to_owned(),
        address: form.text("address")?.to_owned(),
    };
    fields
        .validate()
        .map_err(|e| crate::errors::AppError::validation(format_validation_errors(&e)))?;

    let image_url = match form.image {
        Some(image) => Some(store_uploaded_image(state.files.as_ref(), image).await?),
        None => None,
    };

    let changes = PlaceChanges {
        title: fields.title,
        description: fields.description,
        address: fields.address,
        image_url: image_url.clone(),
    };

    let place = match state
        .place_service
        .update_place(place_id, user.id, changes)
        .await
    {
        Ok(place) => place,
        Err(e) => {
            if let Some(reference) = image_url.as_deref() {
                release_image(state.files.as_ref(), reference).await;
            }
            return Err(e);
        }
    };

    Ok(Json(PlaceBody {
        place: PlaceResponse::from(place),
    }))
}

/// Delete a place; only its creator may do so
#[utoipa::path(
    delete,
    path = "/places/{place_id}",
    tag = "Places",
    security(("bearer_auth" = [])),
    params(("place_id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Place deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized or not the creator"),
        (status = 404, description = "Place not found")
    )
)]
pub async fn delete_place(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(place_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.place_service.delete_place(place_id, user.id).await?;

    Ok(Json(MessageResponse::new("Deleted place.")))
}
