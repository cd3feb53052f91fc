use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::{game::GameSummary, group::GroupSummary};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized JSON body placed in the SSE data field.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Build an event with a plain-text data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial frame sent to a subscriber right after it registers.
pub struct Handshake {
    /// Human-readable message confirming the subscription.
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a group's roster or metadata changed.
pub struct GroupUpdatedEvent {
    /// Identifier of the group that changed.
    pub group_id: Uuid,
    /// Materialized group state, credential-free.
    pub group: GroupSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a game has been created inside a group.
pub struct GameCreatedEvent {
    /// Identifier of the new game.
    pub game_id: Uuid,
    /// Identifier of the owning group.
    pub group_id: Uuid,
    /// Materialized game state so subscribers can render without a fetch.
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player inside a game was mutated.
pub struct GameUpdatedEvent {
    /// Identifier of the updated game.
    pub game_id: Uuid,
    /// Identifier of the owning group.
    pub group_id: Uuid,
    /// Materialized game state after the mutation.
    pub game: GameSummary,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a game has been deleted.
pub struct GameDeletedEvent {
    /// Identifier of the deleted game.
    pub game_id: Uuid,
    /// Identifier of the group that owned it.
    pub group_id: Uuid,
}
