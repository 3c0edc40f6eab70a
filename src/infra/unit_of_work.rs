//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages the transaction lifecycle
//! (begin, commit, rollback). The paired place/user writes in place
//! creation and deletion run through [`UnitOfWork::transaction`] so both
//! commit together or neither does.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{place, user};
use super::repositories::{PlaceRepository, PlaceStore, UserRepository, UserStore};
use crate::domain::{NewPlace, Place, User};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories and transaction
/// management. The generic `transaction` method makes this trait not
/// directly mockable; service tests mock the repositories instead and
/// consistency properties are covered by integration tests.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get place repository
    fn places(&self) -> Arc<dyn PlaceRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction. The context borrows the transaction
/// to ensure proper lifetime management.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    /// Get place repository for this transaction
    pub fn places(&self) -> TxPlaceRepository<'_> {
        TxPlaceRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    place_repo: Arc<PlaceStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let place_repo = Arc::new(PlaceStore::new(db.clone()));
        Self {
            db,
            user_repo,
            place_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn places(&self) -> Arc<dyn PlaceRepository> {
        self.place_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Executes all operations within the provided transaction. Holds the
/// mutations to the user's place list that must commit together with
/// the corresponding place row.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Append a place id to the user's place list.
    ///
    /// Fails with NotFound if the user does not exist, rolling back the
    /// enclosing transaction.
    pub async fn append_place(&self, user_id: Uuid, place_id: Uuid) -> AppResult<User> {
        let existing = user::Entity::find_by_id(user_id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut places = existing.places.clone();
        places.0.push(place_id);

        let mut active: user::ActiveModel = existing.into();
        active.places = Set(places);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    /// Remove a place id from the user's place list.
    pub async fn remove_place(&self, user_id: Uuid, place_id: Uuid) -> AppResult<User> {
        let existing = user::Entity::find_by_id(user_id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut places = existing.places.clone();
        places.0.retain(|id| *id != place_id);

        let mut active: user::ActiveModel = existing.into();
        active.places = Set(places);
        active.updated_at = Set(Utc::now().into());

        let model = active.update(self.txn).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }
}

/// Transaction-aware place repository.
pub struct TxPlaceRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxPlaceRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a new place for the given creator.
    pub async fn insert(&self, creator: Uuid, input: NewPlace) -> AppResult<Place> {
        let now = Utc::now();
        let active_model = place::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            description: Set(input.description),
            address: Set(input.address),
            lat: Set(input.location.lat),
            lng: Set(input.location.lng),
            image_url: Set(input.image_url),
            creator: Set(creator),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(self.txn).await.map_err(AppError::from)?;
        Ok(Place::from(model))
    }

    /// Delete a place row.
    ///
    /// Fails with NotFound if the row was already gone, rolling back the
    /// enclosing transaction.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = place::Entity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
