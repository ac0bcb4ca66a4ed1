use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement body. Carries no user-identifying data.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
