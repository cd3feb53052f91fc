use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Whole persisted document: every group, with its games nested inside.
///
/// The document store always loads and saves this as a single unit, so the
/// default value is what a fresh deployment starts from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentEntity {
    /// All groups, in insertion order.
    #[serde(default)]
    pub groups: Vec<GroupEntity>,
}

/// Password-protected collection of players and their game history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupEntity {
    /// Stable identifier for the group.
    pub id: Uuid,
    /// Display name of the group.
    pub name: String,
    /// Hex-encoded credential digest. Legacy records written before hashing
    /// was introduced hold the plaintext password in this slot with no salt;
    /// the startup migration rewrites those in place.
    pub password_hash: String,
    /// Hex-encoded random salt mixed into the digest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_salt: Option<String>,
    /// Roster of player names, unique within the group, append-only.
    pub player_names: Vec<String>,
    /// Played games, newest appended last.
    #[serde(default)]
    pub games: Vec<GameEntity>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the group or anything nested inside it was mutated.
    pub updated_at: SystemTime,
}

/// One played round belonging to exactly one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Stable identifier for the game.
    pub id: Uuid,
    /// Creation timestamp of the round.
    pub date: SystemTime,
    /// Participant snapshots, fixed at creation time.
    pub players: Vec<PlayerEntity>,
}

/// Per-player outcome and counters within one game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Player name, drawn from the owning group's roster at creation time.
    pub name: String,
    /// Whether this player lost the round. At most one per game.
    pub lost: bool,
    /// Penalty flag, independent of `lost` except that losing hooks you.
    pub hooked: bool,
    /// Number of 421 rolls scored.
    pub four21_count: u32,
    /// Number of rerolls granted by a 421.
    pub four21_rerolls: u32,
    /// Number of nenette rolls scored.
    pub nenette_count: u32,
}

impl PlayerEntity {
    /// Fresh participant snapshot with all flags cleared and counters at zero.
    pub fn new(name: String) -> Self {
        Self {
            name,
            lost: false,
            hooked: false,
            four21_count: 0,
            four21_rerolls: 0,
            nenette_count: 0,
        }
    }
}

impl GroupEntity {
    /// Find a game by id within this group.
    pub fn game(&self, game_id: Uuid) -> Option<&GameEntity> {
        self.games.iter().find(|game| game.id == game_id)
    }
}

impl GameEntity {
    /// Find a participant by name within this game.
    pub fn player_mut(&mut self, name: &str) -> Option<&mut PlayerEntity> {
        self.players.iter_mut().find(|player| player.name == name)
    }
}
