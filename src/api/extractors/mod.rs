//! Custom extractors for the API layer.

mod current_user;
mod multipart_form;
mod validated_json;

pub use current_user::CurrentUser;
pub use multipart_form::{MultipartForm, UploadedImage};
pub use validated_json::ValidatedJson;

pub(crate) use validated_json::format_validation_errors;
