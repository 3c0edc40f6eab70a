//! User repository - persistence operations for user records.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, Entity as UserEntity, PlaceIds};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

/// Persistence operations on user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List all users, oldest account first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Create a user with an empty place list
    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User>;

    /// Update profile fields; `image` of `None` keeps the current image
    async fn update_profile(&self, id: Uuid, name: String, image: Option<String>)
        -> AppResult<User>;
}

/// SeaORM-backed implementation of [`UserRepository`].
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(&self, name: String, email: String, password_hash: String) -> AppResult<User> {
        let now = Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            image: Set(None),
            places: Set(PlaceIds::default()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        image: Option<String>,
    ) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name);
        if let Some(image) = image {
            active.image = Set(Some(image));
        }
        active.updated_at = Set(Utc::now().into());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }
}
