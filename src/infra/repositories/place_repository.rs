//! Place repository - persistence operations for place records.
//!
//! Creation and deletion are intentionally absent here: they pair a place
//! write with a user write and only exist on the transaction-scoped
//! repositories in `unit_of_work`.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::place::{self, Entity as PlaceEntity};
use crate::domain::{Place, PlaceChanges};
use crate::errors::{AppError, AppResult};

/// Persistence operations on place records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Place>>;

    /// List places created by the given user, oldest first (empty is fine)
    async fn find_by_creator(&self, creator: Uuid) -> AppResult<Vec<Place>>;

    /// Replace title/description/address; `image_url` of `None` keeps the
    /// current image
    async fn update(&self, id: Uuid, changes: PlaceChanges) -> AppResult<Place>;
}

/// SeaORM-backed implementation of [`PlaceRepository`].
pub struct PlaceStore {
    db: DatabaseConnection,
}

impl PlaceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlaceRepository for PlaceStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Place>> {
        let result = PlaceEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Place::from))
    }

    async fn find_by_creator(&self, creator: Uuid) -> AppResult<Vec<Place>> {
        let models = PlaceEntity::find()
            .filter(place::Column::Creator.eq(creator))
            .order_by_asc(place::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Place::from).collect())
    }

    async fn update(&self, id: Uuid, changes: PlaceChanges) -> AppResult<Place> {
        let existing = PlaceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: place::ActiveModel = existing.into();
        active.title = Set(changes.title);
        active.description = Set(changes.description);
        active.address = Set(changes.address);
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Place::from(model))
    }
}
