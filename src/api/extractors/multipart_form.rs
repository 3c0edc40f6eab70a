//! Multipart form collection.
//!
//! The place and profile endpoints accept `multipart/form-data` with text
//! fields plus an optional `image` file part. This module walks the parts
//! once and exposes typed access to both.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;

use crate::config::image_extension;
use crate::errors::{AppError, AppResult};

/// An uploaded image part, not yet written to the file store
pub struct UploadedImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// File extension for the declared content type.
    ///
    /// # Errors
    /// Validation error for content types outside the accepted image set.
    pub fn extension(&self) -> AppResult<&'static str> {
        image_extension(&self.content_type).ok_or_else(|| {
            AppError::validation(format!("Unsupported image type: {}", self.content_type))
        })
    }
}

/// Collected multipart form: text fields plus an optional `image` part
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl MultipartForm {
    /// Drain the multipart stream into memory.
    pub async fn parse(multipart: &mut Multipart) -> AppResult<Self> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == "image" && field.file_name().is_some() {
                let content_type = field
                    .content_type()
                    .map(str::to_owned)
                    .ok_or_else(|| AppError::validation("Image upload has no content type"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?
                    .to_vec();

                image = Some(UploadedImage { content_type, data });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(e.to_string()))?;
                fields.insert(name, value);
            }
        }

        Ok(Self { fields, image })
    }

    /// Get a required text field.
    pub fn text(&self, name: &str) -> AppResult<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::validation(format!("{} is required", name)))
    }

    /// Get and parse a required text field.
    pub fn parsed<T: FromStr>(&self, name: &str) -> AppResult<T> {
        self.text(name)?
            .parse()
            .map_err(|_| AppError::validation(format!("{} is invalid", name)))
    }
}
