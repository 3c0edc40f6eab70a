//! User account service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::{AppResult, OptionExt};
use crate::infra::{FileStore, UnitOfWork};
use crate::services::release_image;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a user by id
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update the user's name and, optionally, profile image
    async fn update_profile(&self, id: Uuid, name: String, image: Option<String>)
        -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    files: Arc<dyn FileStore>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, files: Arc<dyn FileStore>) -> Self {
        Self { uow, files }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: String,
        image: Option<String>,
    ) -> AppResult<User> {
        let user = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found()?;

        let previous_image = user.image;
        let replacing_image = image.is_some();

        let updated = self.uow.users().update_profile(id, name, image).await?;

        // The old image is only released once the new reference is stored
        if replacing_image {
            if let Some(old) = previous_image.as_deref() {
                release_image(self.files.as_ref(), old).await;
            }
        }

        Ok(updated)
    }
}
