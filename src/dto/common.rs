use serde::Serialize;
use utoipa::ToSchema;

/// Minimal acknowledgement body for operations with no payload to return.
#[derive(Debug, Serialize, ToSchema)]
pub struct Acknowledgement {
    /// Human-readable confirmation of what happened.
    pub message: String,
}

impl Acknowledgement {
    /// Build an acknowledgement from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
