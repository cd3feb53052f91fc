use axum::{
    Json, Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, patch},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        common::Acknowledgement,
        game::{AdjustStatRequest, GameSummary, GameWithGroup, PlayerStatusRequest},
    },
    error::AppError,
    routes::session,
    services::game_service,
    state::SharedState,
};

/// Routes handling game lookup, deletion, and per-player mutations.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{id}", get(get_game).delete(delete_game))
        .route("/games/{id}/players/{name}", patch(update_player_status))
        .route("/games/{id}/players/{name}/stats", patch(adjust_player_stat))
}

/// Games carry no owner reference, so protected game routes resolve the
/// owning group first and check the session against it.
async fn ensure_game_access(
    state: &SharedState,
    headers: &HeaderMap,
    game_id: Uuid,
) -> Result<GameWithGroup, AppError> {
    let found = game_service::get_game(state, game_id).await?;
    session::ensure_group_access(state, headers, found.group.id)?;
    Ok(found)
}

/// Fetch one game together with its owning group.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game with owning group", body = GameWithGroup),
        (status = 404, description = "Game not found")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameWithGroup>, AppError> {
    let found = game_service::get_game(&state, id).await?;
    Ok(Json(found))
}

/// Delete one game. Requires a session for the owning group.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game deleted", body = Acknowledgement),
        (status = 401, description = "No valid session for the owning group"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Acknowledgement>, AppError> {
    ensure_game_access(&state, &headers, id).await?;
    game_service::delete_game(&state, id).await?;
    Ok(Json(Acknowledgement::new("game deleted")))
}

/// Update a player's lost and/or hooked flags.
///
/// Both fields are tagged optionals: an absent field is left untouched,
/// which is different from sending `false`.
#[utoipa::path(
    patch,
    path = "/games/{id}/players/{name}",
    tag = "games",
    params(
        ("id" = Uuid, Path, description = "Game identifier"),
        ("name" = String, Path, description = "Player name within the game")
    ),
    request_body = PlayerStatusRequest,
    responses(
        (status = 200, description = "Updated game state", body = GameSummary),
        (status = 400, description = "Neither flag provided"),
        (status = 401, description = "No valid session for the owning group"),
        (status = 404, description = "Game or player not found")
    )
)]
pub async fn update_player_status(
    State(state): State<SharedState>,
    Path((id, name)): Path<(Uuid, String)>,
    headers: HeaderMap,
    Json(payload): Json<PlayerStatusRequest>,
) -> Result<Json<GameSummary>, AppError> {
    ensure_game_access(&state, &headers, id).await?;

    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "provide `lost` and/or `hooked`".into(),
        ));
    }

    let mut summary = None;
    if let Some(lost) = payload.lost {
        summary = Some(game_service::set_player_lost(&state, id, &name, lost).await?);
    }
    if let Some(hooked) = payload.hooked {
        summary = Some(game_service::set_player_hooked(&state, id, &name, hooked).await?);
    }

    // is_empty was checked above, one of the branches ran.
    let summary = summary.ok_or_else(|| AppError::Internal("no status applied".into()))?;
    Ok(Json(summary))
}

/// Adjust one player counter by a unit delta.
#[utoipa::path(
    patch,
    path = "/games/{id}/players/{name}/stats",
    tag = "games",
    params(
        ("id" = Uuid, Path, description = "Game identifier"),
        ("name" = String, Path, description = "Player name within the game")
    ),
    request_body = AdjustStatRequest,
    responses(
        (status = 200, description = "Updated game state", body = GameSummary),
        (status = 400, description = "Unknown stat kind or non-unit delta"),
        (status = 401, description = "No valid session for the owning group"),
        (status = 404, description = "Game or player not found"),
        (status = 409, description = "Counter would go negative")
    )
)]
pub async fn adjust_player_stat(
    State(state): State<SharedState>,
    Path((id, name)): Path<(Uuid, String)>,
    headers: HeaderMap,
    Json(payload): Json<AdjustStatRequest>,
) -> Result<Json<GameSummary>, AppError> {
    ensure_game_access(&state, &headers, id).await?;
    payload.validate()?;
    let summary =
        game_service::adjust_player_stat(&state, id, &name, payload.stat, payload.delta).await?;
    Ok(Json(summary))
}
