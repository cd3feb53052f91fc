use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by the health check endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is able to answer.
    pub status: &'static str,
}

impl HealthResponse {
    /// Healthy response value.
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
