//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User domain entity.
///
/// `places` mirrors the ids of every place this user created. The place
/// lifecycle service keeps it consistent with the places table inside a
/// single store transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: Option<String>,
    pub places: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with no places
    pub fn new(id: Uuid, name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            email,
            password_hash,
            image: None,
            places: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// User response (safe to return to client, password excluded)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "Ann Example")]
    pub name: String,
    /// User email address
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// Profile image reference, if one was uploaded
    pub image: Option<String>,
    /// Ids of the places this user created
    pub places: Vec<Uuid>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            places: user.places,
            created_at: user.created_at,
        }
    }
}
