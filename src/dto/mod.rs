use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Common response envelopes.
pub mod common;
/// Game payloads: creation, player updates, stat adjustments.
pub mod game;
/// Group payloads: creation, roster updates, password verification.
pub mod group;
/// Health check payloads.
pub mod health;
/// Server-sent event payloads.
pub mod sse;
/// Validation helpers for DTOs.
pub mod validation;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
