//! Place domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Geographic coordinates of a place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[schema(example = 40.7484)]
    pub lat: f64,
    #[schema(example = -73.9857)]
    pub lng: f64,
}

/// Place domain entity, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Location,
    pub image_url: Option<String>,
    pub creator: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Check whether the given user is allowed to modify this place
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.creator == user_id
    }
}

/// Input for creating a place
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Location,
    pub image_url: Option<String>,
}

/// Input for updating a place; `image_url` of `None` keeps the current image
#[derive(Debug, Clone)]
pub struct PlaceChanges {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image_url: Option<String>,
}

/// Place response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    /// Unique place identifier
    #[schema(example = "67e55044-10b1-426f-9247-bb680e5fe0c8")]
    pub id: Uuid,
    /// Place title
    #[schema(example = "Empire State Building")]
    pub title: String,
    /// Longer description of the place
    pub description: String,
    /// Postal address
    #[schema(example = "20 W 34th St, New York, NY 10001")]
    pub address: String,
    /// Geographic coordinates
    pub location: Location,
    /// Stored image reference, if an image was uploaded
    pub image_url: Option<String>,
    /// Id of the user who created this place
    pub creator: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Place> for PlaceResponse {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            title: place.title,
            description: place.description,
            address: place.address,
            location: place.location,
            image_url: place.image_url,
            creator: place.creator,
            created_at: place.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_place(creator: Uuid) -> Place {
        let now = Utc::now();
        Place {
            id: Uuid::new_v4(),
            title: "Cafe".to_string(),
            description: "A quiet corner cafe".to_string(),
            address: "1 Main St".to_string(),
            location: Location { lat: 1.0, lng: 2.0 },
            image_url: None,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn ownership_check_matches_creator() {
        let creator = Uuid::new_v4();
        let place = sample_place(creator);

        assert!(place.is_owned_by(creator));
        assert!(!place.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn response_uses_camel_case_keys() {
        let place = sample_place(Uuid::new_v4());
        let json = serde_json::to_value(PlaceResponse::from(place)).unwrap();

        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["location"]["lat"], 1.0);
    }
}
