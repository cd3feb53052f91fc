use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Game lookup and per-player mutation endpoints.
pub mod games;
/// Group lifecycle and session endpoints.
pub mod groups;
/// Health check endpoint.
pub mod health;
/// Group access session cookies.
pub mod session;
/// Server-sent events endpoint.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(groups::router())
        .merge(games::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
