use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::GroupEntity,
    dto::{
        format_system_time,
        game::GameSummary,
        validation::{validate_player_name, validate_player_names},
    },
};

/// Payload used to create a new group.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGroupRequest {
    /// Display name of the group.
    #[validate(length(min = 1, message = "Group name must not be empty"))]
    pub name: String,
    /// Password protecting the group. Never stored as-is.
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    /// Initial roster, at least two names.
    #[validate(custom(function = validate_player_names))]
    pub player_names: Vec<String>,
}

/// Payload used to append one player to a group roster.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddPlayerRequest {
    /// Name to append; trimmed before any check.
    #[validate(custom(function = validate_player_name))]
    pub player_name: String,
}

/// Payload carrying a password to check against a group credential.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPasswordRequest {
    /// Candidate password.
    pub password: String,
}

/// Group representation handed to clients. Credential material is never
/// part of this type, so it cannot leak through responses or events.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GroupSummary {
    /// Group identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Current roster.
    pub player_names: Vec<String>,
    /// Number of games recorded so far.
    pub game_count: usize,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last mutation.
    pub updated_at: String,
}

/// Full group view including its game history.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDetail {
    /// Summary fields of the group.
    #[serde(flatten)]
    pub summary: GroupSummary,
    /// Games in chronological order, newest last.
    pub games: Vec<GameSummary>,
}

impl From<&GroupEntity> for GroupSummary {
    fn from(entity: &GroupEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            player_names: entity.player_names.clone(),
            game_count: entity.games.len(),
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}

impl From<&GroupEntity> for GroupDetail {
    fn from(entity: &GroupEntity) -> Self {
        Self {
            summary: GroupSummary::from(entity),
            games: entity.games.iter().map(GameSummary::from).collect(),
        }
    }
}
