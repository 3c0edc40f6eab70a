//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, DiskStore, FileStore};
use crate::services::{AuthService, PlaceService, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Place service
    pub place_service: Arc<dyn PlaceService>,
    /// Image file store
    pub files: Arc<dyn FileStore>,
    /// Database handle
    pub database: Database,
}

impl AppState {
    /// Create application state from a connected database and config.
    ///
    /// This is the recommended way to create AppState; it wires the
    /// services through the shared Unit of Work.
    pub fn from_config(database: Database, config: Config) -> Self {
        let files: Arc<dyn FileStore> = Arc::new(DiskStore::new(&config.upload_dir));
        let container =
            Services::from_connection(database.connection().clone(), config, files.clone());

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            place_service: container.places(),
            files,
            database,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        place_service: Arc<dyn PlaceService>,
        files: Arc<dyn FileStore>,
        database: Database,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            place_service,
            files,
            database,
        }
    }
}
