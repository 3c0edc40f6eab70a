//! placeshare - REST backend for a places-sharing application
//!
//! Users register and authenticate, then create, update and delete place
//! records with images attributed to their account. A place row and its id
//! in the creator's place list always change together, inside one store
//! transaction.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities (User, Place, Password)
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, file storage)
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Place, User};
pub use errors::{AppError, AppResult};
