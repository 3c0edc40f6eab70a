//! Image file storage.
//!
//! Uploaded images are opaque resources to the rest of the application:
//! handlers place bytes here and services release stale references.
//! Removal is best-effort; callers log failures and move on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Opaque store for uploaded image files.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist image bytes, returning the stored reference
    /// (a relative path such as `uploads/images/<uuid>.png`).
    async fn store(&self, extension: &str, data: Vec<u8>) -> AppResult<String>;

    /// Remove a previously stored image.
    async fn remove(&self, reference: &str) -> AppResult<()>;
}

/// Disk-backed file store rooted at the configured upload directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileStore for DiskStore {
    async fn store(&self, extension: &str, data: Vec<u8>) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create upload dir: {}", e)))?;

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store image: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }

    async fn remove(&self, reference: &str) -> AppResult<()> {
        // Stored references are paths under the upload root; refuse anything else
        // so a corrupted record cannot delete arbitrary files.
        let path = Path::new(reference);
        if !path.starts_with(&self.root) {
            return Err(AppError::internal(format!(
                "Refusing to remove file outside upload dir: {}",
                reference
            )));
        }

        tokio::fs::remove_file(path)
            .await
            .map_err(|e| AppError::internal(format!("Failed to remove image: {}", e)))
    }
}
