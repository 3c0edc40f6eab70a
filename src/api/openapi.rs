//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, place_handler, user_handler};
use crate::domain::{Location, PlaceResponse, UserResponse};
use crate::services::AuthSession;
use crate::types::MessageResponse;

/// OpenAPI documentation for the placeshare API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "placeshare",
        version = "0.1.0",
        description = "REST backend for sharing places with images",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Place endpoints
        place_handler::get_place,
        place_handler::list_user_places,
        place_handler::create_place,
        place_handler::update_place,
        place_handler::delete_place,
        // User endpoints
        auth_handler::signup,
        auth_handler::login,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
    ),
    components(
        schemas(
            // Domain types
            Location,
            PlaceResponse,
            UserResponse,
            AuthSession,
            MessageResponse,
            // Request types
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            place_handler::CreatePlaceForm,
            place_handler::UpdatePlaceForm,
            place_handler::PlaceBody,
            place_handler::PlacesBody,
            user_handler::UpdateProfileForm,
            user_handler::UserBody,
            user_handler::UsersBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Places", description = "Place creation and lifecycle"),
        (name = "Users", description = "Registration, login and profiles")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /users/login"))
                        .build(),
                ),
            );
        }
    }
}
