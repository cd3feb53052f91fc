use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameEntity, PlayerEntity},
    dto::{format_system_time, validation::validate_player_names},
};

/// Payload used to record a new game inside a group.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Participants for this round; every name must already be in the
    /// group roster.
    #[validate(custom(function = validate_player_names))]
    pub player_names: Vec<String>,
}

/// Per-player status update. Each field is an explicit present/absent
/// value so `false` is never conflated with "not provided".
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerStatusRequest {
    /// When present, set or clear the lost flag.
    #[serde(default)]
    pub lost: Option<bool>,
    /// When present, set or clear the hooked flag.
    #[serde(default)]
    pub hooked: Option<bool>,
}

impl PlayerStatusRequest {
    /// True when the payload carries nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.lost.is_none() && self.hooked.is_none()
    }
}

/// Counters that can be adjusted per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub enum StatKind {
    /// Number of 421 rolls scored.
    #[serde(rename = "four21Count")]
    Four21Count,
    /// Number of rerolls granted by a 421.
    #[serde(rename = "four21Rerolls")]
    Four21Rerolls,
    /// Number of nenette rolls scored.
    #[serde(rename = "nenetteCount")]
    NenetteCount,
}

/// Payload adjusting one counter by one unit in either direction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdjustStatRequest {
    /// Which counter to adjust.
    pub stat: StatKind,
    /// Either `+1` or `-1`.
    pub delta: i8,
}

impl Validate for AdjustStatRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        if matches!(self.delta, -1 | 1) {
            return Ok(());
        }

        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("delta_unit");
        err.message = Some("Delta must be -1 or +1".into());
        errors.add("delta", err);
        Err(errors)
    }
}

/// Game representation handed to clients and carried by events.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    /// Game identifier.
    pub id: Uuid,
    /// RFC 3339 creation timestamp of the round.
    pub date: String,
    /// Participant snapshots.
    pub players: Vec<PlayerSummary>,
}

/// Participant snapshot inside a [`GameSummary`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Player name.
    pub name: String,
    /// Whether this player lost the round.
    pub lost: bool,
    /// Penalty flag.
    pub hooked: bool,
    /// Number of 421 rolls scored.
    pub four21_count: u32,
    /// Number of rerolls granted by a 421.
    pub four21_rerolls: u32,
    /// Number of nenette rolls scored.
    pub nenette_count: u32,
}

/// Game together with the group that owns it, as returned by game lookup.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameWithGroup {
    /// The requested game.
    pub game: GameSummary,
    /// Owning group, credential-free.
    pub group: crate::dto::group::GroupSummary,
}

impl From<&GameEntity> for GameSummary {
    fn from(entity: &GameEntity) -> Self {
        Self {
            id: entity.id,
            date: format_system_time(entity.date),
            players: entity.players.iter().map(PlayerSummary::from).collect(),
        }
    }
}

impl From<&PlayerEntity> for PlayerSummary {
    fn from(entity: &PlayerEntity) -> Self {
        Self {
            name: entity.name.clone(),
            lost: entity.lost,
            hooked: entity.hooked,
            four21_count: entity.four21_count,
            four21_rerolls: entity.four21_rerolls,
            nenette_count: entity.nenette_count,
        }
    }
}
