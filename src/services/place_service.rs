//! Place lifecycle service.
//!
//! Holds the cross-entity consistency rule: a place row and its id in the
//! creator's place list always change together, inside one store
//! transaction.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewPlace, Place, PlaceChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{FileStore, UnitOfWork};
use crate::services::release_image;

/// Place service trait for dependency injection.
#[async_trait]
pub trait PlaceService: Send + Sync {
    /// Get a place by id
    async fn get_place(&self, id: Uuid) -> AppResult<Place>;

    /// List all places created by the given user; empty is not an error
    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Place>>;

    /// Create a place and record it on the creator, atomically
    async fn create_place(&self, creator: Uuid, input: NewPlace) -> AppResult<Place>;

    /// Update a place; only its creator may do so
    async fn update_place(
        &self,
        id: Uuid,
        requester: Uuid,
        changes: PlaceChanges,
    ) -> AppResult<Place>;

    /// Delete a place and unrecord it from the creator, atomically
    async fn delete_place(&self, id: Uuid, requester: Uuid) -> AppResult<()>;
}

/// Concrete implementation of PlaceService using Unit of Work.
pub struct PlaceManager<U: UnitOfWork> {
    uow: Arc<U>,
    files: Arc<dyn FileStore>,
}

impl<U: UnitOfWork> PlaceManager<U> {
    pub fn new(uow: Arc<U>, files: Arc<dyn FileStore>) -> Self {
        Self { uow, files }
    }
}

#[async_trait]
impl<U: UnitOfWork> PlaceService for PlaceManager<U> {
    async fn get_place(&self, id: Uuid) -> AppResult<Place> {
        self.uow
            .places()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn list_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Place>> {
        self.uow.places().find_by_creator(user_id).await
    }

    async fn create_place(&self, creator: Uuid, input: NewPlace) -> AppResult<Place> {
        // The creator must exist before the paired write begins
        self.uow
            .users()
            .find_by_id(creator)
            .await?
            .ok_or_not_found()?;

        // Insert the place and append it to the creator's list in one
        // transaction; a failure of either write rolls back both.
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let place = ctx.places().insert(creator, input).await?;
                    ctx.users().append_place(creator, place.id).await?;
                    Ok(place)
                })
            })
            .await
    }

    async fn update_place(
        &self,
        id: Uuid,
        requester: Uuid,
        changes: PlaceChanges,
    ) -> AppResult<Place> {
        let place = self
            .uow
            .places()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        if !place.is_owned_by(requester) {
            return Err(AppError::Forbidden);
        }

        let previous_image = place.image_url;
        let replacing_image = changes.image_url.is_some();

        let updated = self.uow.places().update(id, changes).await?;

        // The old image is only released once the new reference is stored
        if replacing_image {
            if let Some(old) = previous_image.as_deref() {
                release_image(self.files.as_ref(), old).await;
            }
        }

        Ok(updated)
    }

    async fn delete_place(&self, id: Uuid, requester: Uuid) -> AppResult<()> {
        let place = self
            .uow
            .places()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        if !place.is_owned_by(requester) {
            return Err(AppError::Forbidden);
        }

        let creator = place.creator;
        let place_id = place.id;

        // Remove the row and the creator's list entry together; a missing
        // creator surfaces as NotFound and rolls back the row delete.
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.places().delete(place_id).await?;
                    ctx.users().remove_place(creator, place_id).await?;
                    Ok(())
                })
            })
            .await?;

        // Image cleanup runs outside the transaction, after the commit
        if let Some(image) = place.image_url.as_deref() {
            release_image(self.files.as_ref(), image).await;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mockall::predicate::eq;

    use crate::domain::Location;
    use crate::infra::{MockFileStore, MockPlaceRepository, MockUserRepository};
    use crate::services::test_support::StubUow;

    fn sample_place(id: Uuid, creator: Uuid, image_url: Option<String>) -> Place {
        let now = Utc::now();
        Place {
            id,
            title: "Cafe".to_string(),
            description: "A quiet corner cafe".to_string(),
            address: "1 Main St".to_string(),
            location: Location { lat: 1.0, lng: 2.0 },
            image_url,
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_changes(image_url: Option<String>) -> PlaceChanges {
        PlaceChanges {
            title: "Bistro".to_string(),
            description: "No longer a cafe".to_string(),
            address: "2 Main St".to_string(),
            image_url,
        }
    }

    fn service(
        users: MockUserRepository,
        places: MockPlaceRepository,
        files: MockFileStore,
    ) -> PlaceManager<StubUow> {
        PlaceManager::new(Arc::new(StubUow::new(users, places)), Arc::new(files))
    }

    #[tokio::test]
    async fn get_place_not_found() {
        let mut places = MockPlaceRepository::new();
        places.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(MockUserRepository::new(), places, MockFileStore::new());
        let result = svc.get_place(Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn list_by_creator_empty_is_ok() {
        let mut places = MockPlaceRepository::new();
        places.expect_find_by_creator().returning(|_| Ok(vec![]));

        let svc = service(MockUserRepository::new(), places, MockFileStore::new());
        let result = svc.list_by_creator(Uuid::new_v4()).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn create_place_requires_existing_creator() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(users, MockPlaceRepository::new(), MockFileStore::new());
        let input = NewPlace {
            title: "Cafe".to_string(),
            description: "A quiet corner cafe".to_string(),
            address: "1 Main St".to_string(),
            location: Location { lat: 1.0, lng: 2.0 },
            image_url: None,
        };
        let result = svc.create_place(Uuid::new_v4(), input).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn update_by_non_creator_is_forbidden() {
        let place_id = Uuid::new_v4();
        let creator = Uuid::new_v4();

        let mut places = MockPlaceRepository::new();
        places
            .expect_find_by_id()
            .with(eq(place_id))
            .returning(move |id| Ok(Some(sample_place(id, creator, None))));
        places.expect_update().never();

        let svc = service(MockUserRepository::new(), places, MockFileStore::new());
        let result = svc
            .update_place(place_id, Uuid::new_v4(), sample_changes(None))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[tokio::test]
    async fn update_with_new_image_releases_old_one() {
        let place_id = Uuid::new_v4();
        let creator = Uuid::new_v4();

        let mut places = MockPlaceRepository::new();
        places.expect_find_by_id().returning(move |id| {
            Ok(Some(sample_place(
                id,
                creator,
                Some("uploads/images/old.png".to_string()),
            )))
        });
        places.expect_update().returning(move |id, changes| {
            Ok(sample_place(id, creator, changes.image_url))
        });

        let mut files = MockFileStore::new();
        files
            .expect_remove()
            .with(eq("uploads/images/old.png"))
            .times(1)
            .returning(|_| Ok(()));

        let svc = service(MockUserRepository::new(), places, files);
        let updated = svc
            .update_place(
                place_id,
                creator,
                sample_changes(Some("uploads/images/new.png".to_string())),
            )
            .await
            .unwrap();

        assert_eq!(updated.image_url.as_deref(), Some("uploads/images/new.png"));
    }

    #[tokio::test]
    async fn update_without_new_image_keeps_old_file() {
        let creator = Uuid::new_v4();

        let mut places = MockPlaceRepository::new();
        places.expect_find_by_id().returning(move |id| {
            Ok(Some(sample_place(
                id,
                creator,
                Some("uploads/images/old.png".to_string()),
            )))
        });
        places
            .expect_update()
            .returning(move |id, _| Ok(sample_place(id, creator, None)));

        let mut files = MockFileStore::new();
        files.expect_remove().never();

        let svc = service(MockUserRepository::new(), places, files);
        svc.update_place(Uuid::new_v4(), creator, sample_changes(None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_image_release_does_not_fail_update() {
        let creator = Uuid::new_v4();

        let mut places = MockPlaceRepository::new();
        places.expect_find_by_id().returning(move |id| {
            Ok(Some(sample_place(
                id,
                creator,
                Some("uploads/images/old.png".to_string()),
            )))
        });
        places.expect_update().returning(move |id, changes| {
            Ok(sample_place(id, creator, changes.image_url))
        });

        let mut files = MockFileStore::new();
        files
            .expect_remove()
            .returning(|_| Err(AppError::internal("disk unavailable")));

        let svc = service(MockUserRepository::new(), places, files);
        let result = svc
            .update_place(
                Uuid::new_v4(),
                creator,
                sample_changes(Some("uploads/images/new.png".to_string())),
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn delete_by_non_creator_is_forbidden() {
        let creator = Uuid::new_v4();

        let mut places = MockPlaceRepository::new();
        places
            .expect_find_by_id()
            .returning(move |id| Ok(Some(sample_place(id, creator, None))));

        let svc = service(MockUserRepository::new(), places, MockFileStore::new());
        let result = svc.delete_place(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[tokio::test]
    async fn delete_missing_place_not_found() {
        let mut places = MockPlaceRepository::new();
        places.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(MockUserRepository::new(), places, MockFileStore::new());
        let result = svc.delete_place(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }
}
