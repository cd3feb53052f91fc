/// Password derivation, verification, and legacy migration.
pub mod credential_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Game lifecycle and per-player mutations.
pub mod game_service;
/// Group lifecycle, roster, and password verification.
pub mod group_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
