use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        game::GameSummary,
        group::GroupSummary,
        sse::{GameCreatedEvent, GameDeletedEvent, GameUpdatedEvent, GroupUpdatedEvent, ServerEvent},
    },
    state::SharedState,
};

const EVENT_GROUP_UPDATED: &str = "group-updated";
const EVENT_GAME_CREATED: &str = "game-created";
const EVENT_GAME_UPDATED: &str = "game-updated";
const EVENT_GAME_DELETED: &str = "game-deleted";

/// Broadcast that a group changed (creation, roster addition, deletion).
pub fn broadcast_group_updated(state: &SharedState, group: &GroupSummary) {
    let payload = GroupUpdatedEvent {
        group_id: group.id,
        group: group.clone(),
    };
    send_event(state, EVENT_GROUP_UPDATED, &payload);
}

/// Broadcast that a game was created, with its materialized state.
pub fn broadcast_game_created(state: &SharedState, group_id: Uuid, game: &GameSummary) {
    let payload = GameCreatedEvent {
        game_id: game.id,
        group_id,
        game: game.clone(),
    };
    send_event(state, EVENT_GAME_CREATED, &payload);
}

/// Broadcast a player mutation, with the game's materialized state.
pub fn broadcast_game_updated(state: &SharedState, group_id: Uuid, game: &GameSummary) {
    let payload = GameUpdatedEvent {
        game_id: game.id,
        group_id,
        game: game.clone(),
    };
    send_event(state, EVENT_GAME_UPDATED, &payload);
}

/// Broadcast that a game has been deleted.
pub fn broadcast_game_deleted(state: &SharedState, group_id: Uuid, game_id: Uuid) {
    let payload = GameDeletedEvent { game_id, group_id };
    send_event(state, EVENT_GAME_DELETED, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.events().publish(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
