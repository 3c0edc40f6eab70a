//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use the Unit of Work for centralized repository access
//! and transaction management.

mod auth_service;
pub mod container;
mod place_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, AuthSession, Authenticator, Claims};
pub use place_service::{PlaceManager, PlaceService};
pub use user_service::{UserManager, UserService};

use crate::infra::FileStore;

/// Best-effort release of a stored image.
///
/// Runs outside any transaction; a failure is logged and never propagated.
pub(crate) async fn release_image(files: &dyn FileStore, reference: &str) {
    if let Err(e) = files.remove(reference).await {
        tracing::warn!(reference, error = %e, "Failed to release image file");
    }
}
