//! HTTP-level tests for the router.
//!
//! Services are replaced with hand-rolled doubles so these tests exercise
//! routing, extraction, validation and status mapping without a database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use tower::ServiceExt;
use uuid::Uuid;

use placeshare::config::Config;
use placeshare::domain::{Location, NewPlace, Place, PlaceChanges, User};
use placeshare::errors::{AppError, AppResult};
use placeshare::infra::{Database, FileStore};
use placeshare::services::{AuthService, AuthSession, Claims, PlaceService, UserService};
use placeshare::AppState;

const TEST_TOKEN: &str = "valid-test-token";

fn fixed_user_id() -> Uuid {
    Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
}

fn fixed_place_id() -> Uuid {
    Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
}

fn sample_place() -> Place {
    let now = Utc::now();
    Place {
        id: fixed_place_id(),
        title: "Cafe".to_string(),
        description: "A quiet corner cafe".to_string(),
        address: "1 Main St".to_string(),
        location: Location {
            lat: 40.7484,
            lng: -73.9857,
        },
        image_url: None,
        creator: fixed_user_id(),
        created_at: now,
        updated_at: now,
    }
}

fn sample_user() -> User {
    User::new(
        fixed_user_id(),
        "Ann".to_string(),
        "ann@example.com".to_string(),
        "hashed".to_string(),
    )
}

// =============================================================================
// Service doubles
// =============================================================================

struct StubAuthService;

#[async_trait]
impl AuthService for StubAuthService {
    async fn register(
        &self,
        _name: String,
        email: String,
        _password: String,
    ) -> AppResult<AuthSession> {
        Ok(AuthSession {
            user_id: fixed_user_id(),
            email,
            token: "issued-token".to_string(),
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        if password == "secret1" {
            Ok(AuthSession {
                user_id: fixed_user_id(),
                email,
                token: "issued-token".to_string(),
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        if token == TEST_TOKEN {
            Ok(Claims {
                sub: fixed_user_id(),
                email: "ann@example.com".to_string(),
                exp: Utc::now().timestamp() + 3600,
                iat: Utc::now().timestamp(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

struct StubUserService;

#[async_trait]
impl UserService for StubUserService {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        if id == fixed_user_id() {
            Ok(sample_user())
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(vec![sample_user()])
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        image: Option<String>,
    ) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        user.name = name;
        if image.is_some() {
            user.image = image;
        }
        Ok(user)
    }
}

struct StubPlaceService;

#[async_trait]
impl PlaceService for StubPlaceService {
    async fn get_place(&self, id: Uuid) -> AppResult<Place> {
        if id == fixed_place_id() {
            Ok(sample_place())
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Place>> {
        if user_id == fixed_user_id() {
            Ok(vec![sample_place()])
        } else {
            Ok(vec![])
        }
    }

    async fn create_place(&self, creator: Uuid, input: NewPlace) -> AppResult<Place> {
        let now = Utc::now();
        Ok(Place {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            address: input.address,
            location: input.location,
            image_url: input.image_url,
            creator,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_place(
        &self,
        id: Uuid,
        requester: Uuid,
        changes: PlaceChanges,
    ) -> AppResult<Place> {
        let mut place = self.get_place(id).await?;
        if place.creator != requester {
            return Err(AppError::Forbidden);
        }
        place.title = changes.title;
        place.description = changes.description;
        place.address = changes.address;
        Ok(place)
    }

    async fn delete_place(&self, id: Uuid, requester: Uuid) -> AppResult<()> {
        let place = self.get_place(id).await?;
        if place.creator != requester {
            return Err(AppError::Forbidden);
        }
        Ok(())
    }
}

struct NullFileStore;

#[async_trait]
impl FileStore for NullFileStore {
    async fn store(&self, extension: &str, _data: Vec<u8>) -> AppResult<String> {
        Ok(format!("uploads/images/stored.{}", extension))
    }

    async fn remove(&self, _reference: &str) -> AppResult<()> {
        Ok(())
    }
}

// =============================================================================
// Test helpers
// =============================================================================

async fn test_router() -> Router {
    std::env::set_var("JWT_SECRET", "integration-test-secret-key-32-chars");
    let config = Config::from_env();

    // Real in-memory store; only the health probe touches it here
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let connection = SeaDatabase::connect(options).await.expect("sqlite connect");

    let state = AppState::new(
        Arc::new(StubAuthService),
        Arc::new(StubUserService),
        Arc::new(StubPlaceService),
        Arc::new(NullFileStore),
        Database::new(connection),
    );

    placeshare::api::create_router(state, &config)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn multipart_request(uri: &str, method: &str, token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

// =============================================================================
// Place endpoints
// =============================================================================

#[tokio::test]
async fn get_place_returns_envelope() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/places/{}", fixed_place_id()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["place"]["title"], "Cafe");
    assert_eq!(json["place"]["creator"], fixed_user_id().to_string());
    // Wire format is camelCase
    assert!(json["place"].get("createdAt").is_some());
}

#[tokio::test]
async fn get_unknown_place_is_404() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/places/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn list_user_places_empty_is_200() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/places/user/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["places"], serde_json::json!([]));
}

#[tokio::test]
async fn create_place_requires_token() {
    let app = test_router().await;

    let body = multipart_body(&[
        ("title", "Cafe"),
        ("description", "A quiet corner cafe"),
        ("address", "1 Main St"),
        ("lat", "40.7484"),
        ("lng", "-73.9857"),
    ]);
    let response = app
        .oneshot(multipart_request("/places", "POST", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_place_with_token_is_201() {
    let app = test_router().await;

    let body = multipart_body(&[
        ("title", "Cafe"),
        ("description", "A quiet corner cafe"),
        ("address", "1 Main St"),
        ("lat", "40.7484"),
        ("lng", "-73.9857"),
    ]);
    let response = app
        .oneshot(multipart_request("/places", "POST", Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["place"]["title"], "Cafe");
    assert_eq!(json["place"]["creator"], fixed_user_id().to_string());
    assert_eq!(json["place"]["location"]["lat"], 40.7484);
}

#[tokio::test]
async fn create_place_with_short_description_is_422() {
    let app = test_router().await;

    let body = multipart_body(&[
        ("title", "Cafe"),
        ("description", "tiny"),
        ("address", "1 Main St"),
        ("lat", "40.7484"),
        ("lng", "-73.9857"),
    ]);
    let response = app
        .oneshot(multipart_request("/places", "POST", Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_place_with_bad_latitude_is_422() {
    let app = test_router().await;

    let body = multipart_body(&[
        ("title", "Cafe"),
        ("description", "A quiet corner cafe"),
        ("address", "1 Main St"),
        ("lat", "not-a-number"),
        ("lng", "-73.9857"),
    ]);
    let response = app
        .oneshot(multipart_request("/places", "POST", Some(TEST_TOKEN), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn delete_place_returns_confirmation() {
    let app = test_router().await;

    let response = app
        .oneshot(multipart_request(
            &format!("/places/{}", fixed_place_id()),
            "DELETE",
            Some(TEST_TOKEN),
            String::new(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Deleted place.");
}

#[tokio::test]
async fn update_place_replaces_fields() {
    let app = test_router().await;

    let body = multipart_body(&[
        ("title", "Bistro"),
        ("description", "No longer a cafe"),
        ("address", "2 Main St"),
    ]);
    let response = app
        .oneshot(multipart_request(
            &format!("/places/{}", fixed_place_id()),
            "PATCH",
            Some(TEST_TOKEN),
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["place"]["title"], "Bistro");
}

// =============================================================================
// User endpoints
// =============================================================================

#[tokio::test]
async fn signup_returns_session() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Ann","email":"ann@x.com","password":"secret1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["userId"], fixed_user_id().to_string());
    assert_eq!(json["email"], "ann@x.com");
    assert!(json.get("token").is_some());
}

#[tokio::test]
async fn signup_with_invalid_email_is_422() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Ann","email":"not-an-email","password":"secret1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"ann@x.com","password":"wrong-password"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_never_exposes_password_hashes() {
    let app = test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("hashed"));

    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["users"][0]["email"], "ann@example.com");
}

#[tokio::test]
async fn get_unknown_user_is_404() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/users/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_profile_changes_name() {
    let app = test_router().await;

    let body = multipart_body(&[("name", "Ann Updated")]);
    let response = app
        .oneshot(multipart_request(
            &format!("/users/{}", fixed_user_id()),
            "PATCH",
            None,
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Ann Updated");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_database_status() {
    let app = test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"]["status"], "healthy");
}
