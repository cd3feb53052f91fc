use std::{collections::HashSet, time::SystemTime};

use uuid::Uuid;

use crate::{
    dao::models::{DocumentEntity, GameEntity, GroupEntity, PlayerEntity},
    dto::{
        game::{CreateGameRequest, GameSummary, GameWithGroup, StatKind},
        group::GroupSummary,
        validation::validate_player_names,
    },
    error::ServiceError,
    services::{group_service::find_group_mut, sse_events},
    state::SharedState,
};

/// Record a new game inside a group.
///
/// Every supplied name must already be part of the group roster; a single
/// unknown name rejects the whole operation before anything is appended.
pub async fn create_game(
    state: &SharedState,
    group_id: Uuid,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let player_names: Vec<String> = request
        .player_names
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();
    validate_player_names(&player_names)
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    let summary;
    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        let group = find_group_mut(&mut document, group_id)?;

        let roster: HashSet<&str> = group.player_names.iter().map(String::as_str).collect();
        for name in &player_names {
            if !roster.contains(name.as_str()) {
                return Err(ServiceError::InvalidInput(format!(
                    "player `{name}` is not in the group roster"
                )));
            }
        }

        let game = GameEntity {
            id: Uuid::new_v4(),
            date: SystemTime::now(),
            players: player_names.into_iter().map(PlayerEntity::new).collect(),
        };
        summary = GameSummary::from(&game);
        group.games.push(game);
        group.updated_at = SystemTime::now();
        state.store().save(document).await?;
    }

    sse_events::broadcast_game_created(state, group_id, &summary);
    Ok(summary)
}

/// Look up a game by id together with its owning group.
///
/// Games do not know their owner, so the search scans every group.
pub async fn get_game(state: &SharedState, game_id: Uuid) -> Result<GameWithGroup, ServiceError> {
    let document = state.store().load().await?;
    for group in &document.groups {
        if let Some(game) = group.game(game_id) {
            return Ok(GameWithGroup {
                game: GameSummary::from(game),
                group: GroupSummary::from(group),
            });
        }
    }
    Err(ServiceError::NotFound(format!("game `{game_id}` not found")))
}

/// Delete a game from its owning group. The group itself survives.
pub async fn delete_game(state: &SharedState, game_id: Uuid) -> Result<(), ServiceError> {
    let group_id;
    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        let (group, index) = find_owning_group(&mut document, game_id)?;
        group.games.remove(index);
        group.updated_at = SystemTime::now();
        group_id = group.id;
        state.store().save(document).await?;
    }

    sse_events::broadcast_game_deleted(state, group_id, game_id);
    Ok(())
}

/// Set or clear a player's lost flag.
///
/// Marking a player as lost is a single-loser transition: the player is
/// also hooked, and every other player's lost flag is cleared in the same
/// operation. Clearing the flag touches only that player and leaves the
/// hooked flag alone (the asymmetry is a scoring rule of the game).
pub async fn set_player_lost(
    state: &SharedState,
    game_id: Uuid,
    player_name: &str,
    lost: bool,
) -> Result<GameSummary, ServiceError> {
    mutate_game(state, game_id, |game| {
        game.player_mut(player_name).ok_or_else(|| {
            ServiceError::NotFound(format!("player `{player_name}` not found in game"))
        })?;

        if lost {
            for player in &mut game.players {
                if player.name == player_name {
                    player.lost = true;
                    player.hooked = true;
                } else {
                    player.lost = false;
                }
            }
        } else if let Some(player) = game.player_mut(player_name) {
            player.lost = false;
        }

        Ok(())
    })
    .await
}

/// Set or clear a player's hooked flag, independent of the lost flag.
pub async fn set_player_hooked(
    state: &SharedState,
    game_id: Uuid,
    player_name: &str,
    hooked: bool,
) -> Result<GameSummary, ServiceError> {
    mutate_game(state, game_id, |game| {
        let player = game.player_mut(player_name).ok_or_else(|| {
            ServiceError::NotFound(format!("player `{player_name}` not found in game"))
        })?;
        player.hooked = hooked;
        Ok(())
    })
    .await
}

/// Adjust one player counter by a unit delta.
///
/// An adjustment that would push the counter below zero is rejected and
/// leaves the document untouched.
pub async fn adjust_player_stat(
    state: &SharedState,
    game_id: Uuid,
    player_name: &str,
    stat: StatKind,
    delta: i8,
) -> Result<GameSummary, ServiceError> {
    if !matches!(delta, -1 | 1) {
        return Err(ServiceError::InvalidInput(format!(
            "delta must be -1 or +1, got {delta}"
        )));
    }

    mutate_game(state, game_id, |game| {
        let player = game.player_mut(player_name).ok_or_else(|| {
            ServiceError::NotFound(format!("player `{player_name}` not found in game"))
        })?;

        let counter = match stat {
            StatKind::Four21Count => &mut player.four21_count,
            StatKind::Four21Rerolls => &mut player.four21_rerolls,
            StatKind::NenetteCount => &mut player.nenette_count,
        };

        *counter = match delta {
            1 => counter.saturating_add(1),
            _ => counter.checked_sub(1).ok_or_else(|| {
                ServiceError::Rejected(format!(
                    "counter would go negative for player `{player_name}`"
                ))
            })?,
        };

        Ok(())
    })
    .await
}

/// Shared read-modify-write cycle for per-game mutations: locate the game,
/// apply `mutate`, refresh the group timestamp, persist, then broadcast one
/// game-updated event. Validation failures inside `mutate` leave the
/// persisted document untouched.
async fn mutate_game(
    state: &SharedState,
    game_id: Uuid,
    mutate: impl FnOnce(&mut GameEntity) -> Result<(), ServiceError>,
) -> Result<GameSummary, ServiceError> {
    let (group_id, summary);
    {
        let _gate = state.lock_document().await;
        let mut document = state.store().load().await?;
        let (group, index) = find_owning_group(&mut document, game_id)?;
        group_id = group.id;

        mutate(&mut group.games[index])?;
        group.updated_at = SystemTime::now();
        summary = GameSummary::from(&group.games[index]);
        state.store().save(document).await?;
    }

    sse_events::broadcast_game_updated(state, group_id, &summary);
    Ok(summary)
}

fn find_owning_group(
    document: &mut DocumentEntity,
    game_id: Uuid,
) -> Result<(&mut GroupEntity, usize), ServiceError> {
    for group in &mut document.groups {
        if let Some(index) = group.games.iter().position(|game| game.id == game_id) {
            return Ok((group, index));
        }
    }
    Err(ServiceError::NotFound(format!("game `{game_id}` not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::document_store::memory::MemoryStore,
        dto::group::CreateGroupRequest,
        services::group_service,
        state::{AppState, SharedState},
    };
    use std::sync::Arc;

    async fn state_with_group(names: &[&str]) -> (SharedState, Uuid) {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            AppConfig::with_values("unused", false),
        );
        let group = group_service::create_group(
            &state,
            CreateGroupRequest {
                name: "Thursday crew".into(),
                password: "secret".into(),
                player_names: names.iter().map(|s| s.to_string()).collect(),
            },
        )
        .await
        .unwrap();
        (state, group.id)
    }

    fn request(names: &[&str]) -> CreateGameRequest {
        CreateGameRequest {
            player_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn player<'a>(game: &'a GameSummary, name: &str) -> &'a crate::dto::game::PlayerSummary {
        game.players
            .iter()
            .find(|player| player.name == name)
            .unwrap()
    }

    #[tokio::test]
    async fn create_game_snapshots_players_with_zeroed_state() {
        let (state, group_id) = state_with_group(&["Alice", "Bob", "Carol"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        assert_eq!(game.players.len(), 2);
        for player in &game.players {
            assert!(!player.lost);
            assert!(!player.hooked);
            assert_eq!(player.four21_count, 0);
            assert_eq!(player.four21_rerolls, 0);
            assert_eq!(player.nenette_count, 0);
        }
    }

    #[tokio::test]
    async fn create_game_is_all_or_nothing_on_unknown_names() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let result = create_game(&state, group_id, request(&["Alice", "Mallory"])).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));

        let detail = group_service::get_group(&state, group_id).await.unwrap();
        assert!(detail.games.is_empty());
    }

    #[tokio::test]
    async fn create_game_requires_an_existing_group() {
        let (state, _group_id) = state_with_group(&["Alice", "Bob"]).await;
        let result = create_game(&state, Uuid::new_v4(), request(&["Alice", "Bob"])).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn marking_lost_hooks_the_loser_and_resets_everyone_else() {
        let (state, group_id) = state_with_group(&["Alice", "Bob", "Carol"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob", "Carol"]))
            .await
            .unwrap();

        let after_alice = set_player_lost(&state, game.id, "Alice", true).await.unwrap();
        assert!(player(&after_alice, "Alice").lost);
        assert!(player(&after_alice, "Alice").hooked);
        assert!(!player(&after_alice, "Bob").lost);

        let after_bob = set_player_lost(&state, game.id, "Bob", true).await.unwrap();
        assert!(player(&after_bob, "Bob").lost);
        assert!(player(&after_bob, "Bob").hooked);
        assert!(!player(&after_bob, "Alice").lost);
        // Losing earlier hooked Alice; a later loser does not unhook her.
        assert!(player(&after_bob, "Alice").hooked);

        let losers = after_bob.players.iter().filter(|p| p.lost).count();
        assert_eq!(losers, 1);
    }

    #[tokio::test]
    async fn clearing_lost_leaves_hooked_alone() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        set_player_lost(&state, game.id, "Alice", true).await.unwrap();
        let cleared = set_player_lost(&state, game.id, "Alice", false)
            .await
            .unwrap();
        assert!(!player(&cleared, "Alice").lost);
        assert!(player(&cleared, "Alice").hooked);
    }

    #[tokio::test]
    async fn hooked_toggle_is_independent() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let hooked = set_player_hooked(&state, game.id, "Bob", true).await.unwrap();
        assert!(player(&hooked, "Bob").hooked);
        assert!(!player(&hooked, "Bob").lost);

        let unhooked = set_player_hooked(&state, game.id, "Bob", false)
            .await
            .unwrap();
        assert!(!player(&unhooked, "Bob").hooked);
    }

    #[tokio::test]
    async fn stat_adjustment_never_goes_negative() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let result =
            adjust_player_stat(&state, game.id, "Bob", StatKind::NenetteCount, -1).await;
        assert!(matches!(result, Err(ServiceError::Rejected(_))));

        let fetched = get_game(&state, game.id).await.unwrap();
        assert_eq!(player(&fetched.game, "Bob").nenette_count, 0);

        let up = adjust_player_stat(&state, game.id, "Bob", StatKind::NenetteCount, 1)
            .await
            .unwrap();
        assert_eq!(player(&up, "Bob").nenette_count, 1);
        let down = adjust_player_stat(&state, game.id, "Bob", StatKind::NenetteCount, -1)
            .await
            .unwrap();
        assert_eq!(player(&down, "Bob").nenette_count, 0);
    }

    #[tokio::test]
    async fn stat_adjustment_rejects_non_unit_deltas() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let result = adjust_player_stat(&state, game.id, "Bob", StatKind::Four21Count, 2).await;
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn delete_game_removes_only_that_game() {
        let (state, group_id) = state_with_group(&["Alice", "Bob"]).await;
        let first = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();
        let second = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        delete_game(&state, first.id).await.unwrap();
        assert!(matches!(
            get_game(&state, first.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(get_game(&state, second.id).await.is_ok());
        assert!(matches!(
            delete_game(&state, first.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn full_round_scenario() {
        let (state, group_id) = state_with_group(&["Alice", "Bob", "Carol"]).await;
        let game = create_game(&state, group_id, request(&["Alice", "Bob"]))
            .await
            .unwrap();

        let after_alice = set_player_lost(&state, game.id, "Alice", true).await.unwrap();
        assert!(player(&after_alice, "Alice").lost);
        assert!(player(&after_alice, "Alice").hooked);
        assert!(!player(&after_alice, "Bob").lost);

        let after_bob = set_player_lost(&state, game.id, "Bob", true).await.unwrap();
        assert!(player(&after_bob, "Bob").lost);
        assert!(player(&after_bob, "Bob").hooked);
        assert!(!player(&after_bob, "Alice").lost);

        delete_game(&state, game.id).await.unwrap();
        assert!(matches!(
            get_game(&state, game.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
