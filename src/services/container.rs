//! Service container - centralized service construction and access.

use std::sync::Arc;

use super::{AuthService, Authenticator, PlaceManager, PlaceService, UserManager, UserService};
use crate::config::Config;
use crate::infra::{FileStore, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get place service
    fn places(&self) -> Arc<dyn PlaceService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    place_service: Arc<dyn PlaceService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        place_service: Arc<dyn PlaceService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            place_service,
        }
    }

    /// Create service container from a database connection, configuration
    /// and file store
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        files: Arc<dyn FileStore>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone(), files.clone()));
        let place_service = Arc::new(PlaceManager::new(uow, files));

        Self {
            auth_service,
            user_service,
            place_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn places(&self) -> Arc<dyn PlaceService> {
        self.place_service.clone()
    }
}
