use serde::Serialize;
use utoipa::ToSchema;

/// Message-only response, used as a delete confirmation
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation
    #[schema(example = "Deleted place.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
