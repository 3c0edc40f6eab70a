//! HTTP request handlers.

pub mod auth_handler;
pub mod place_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use place_handler::place_routes;
pub use user_handler::user_routes;

use crate::api::extractors::UploadedImage;
use crate::errors::AppResult;
use crate::infra::FileStore;

/// Write an uploaded image to the file store, returning its reference.
pub(crate) async fn store_uploaded_image(
    files: &dyn FileStore,
    image: UploadedImage,
) -> AppResult<String> {
    let extension = image.extension()?;
    files.store(extension, image.data).await
}
