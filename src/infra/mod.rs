//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Image file storage
//! - Unit of Work for transaction management

pub mod db;
pub mod files;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use files::{DiskStore, FileStore};
pub use repositories::{PlaceRepository, PlaceStore, UserRepository, UserStore};
pub use unit_of_work::{
    Persistence, TransactionContext, TxPlaceRepository, TxUserRepository, UnitOfWork,
};

#[cfg(test)]
pub use files::MockFileStore;
#[cfg(test)]
pub use repositories::{MockPlaceRepository, MockUserRepository};
