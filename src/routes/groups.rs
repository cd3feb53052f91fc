use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        common::Acknowledgement,
        game::{CreateGameRequest, GameSummary},
        group::{
            AddPlayerRequest, CreateGroupRequest, GroupDetail, GroupSummary, VerifyPasswordRequest,
        },
    },
    error::AppError,
    routes::session,
    services::{game_service, group_service},
    state::SharedState,
};

/// Routes handling group lifecycle, roster, and access sessions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/groups", get(list_groups).post(create_group))
        .route("/groups/{id}", get(get_group).delete(delete_group))
        .route("/groups/{id}/players", post(add_player))
        .route("/groups/{id}/games", post(create_game))
        .route("/groups/{id}/verify-password", post(verify_password))
        .route("/groups/{id}/logout", post(logout))
}

/// List every group, credential-free.
#[utoipa::path(
    get,
    path = "/groups",
    tag = "groups",
    responses((status = 200, description = "All groups", body = Vec<GroupSummary>))
)]
pub async fn list_groups(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GroupSummary>>, AppError> {
    let groups = group_service::list_groups(&state).await?;
    Ok(Json(groups))
}

/// Create a new group with an initial roster and password.
#[utoipa::path(
    post,
    path = "/groups",
    tag = "groups",
    request_body = CreateGroupRequest,
    responses((status = 200, description = "Group created", body = GroupSummary))
)]
pub async fn create_group(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<GroupSummary>, AppError> {
    payload.validate()?;
    let summary = group_service::create_group(&state, payload).await?;
    Ok(Json(summary))
}

/// Fetch one group with its full game history. Requires a group session.
#[utoipa::path(
    get,
    path = "/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Group detail", body = GroupDetail),
        (status = 401, description = "No valid session for this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn get_group(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<GroupDetail>, AppError> {
    session::ensure_group_access(&state, &headers, id)?;
    let detail = group_service::get_group(&state, id).await?;
    Ok(Json(detail))
}

/// Delete a group and all its games. Requires a group session; the session
/// cookie is revoked alongside.
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    responses(
        (status = 200, description = "Group deleted", body = Acknowledgement),
        (status = 401, description = "No valid session for this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn delete_group(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    session::ensure_group_access(&state, &headers, id)?;
    group_service::delete_group(&state, id).await?;

    let response = (
        StatusCode::OK,
        [(header::SET_COOKIE, session::revoke_cookie(id))],
        Json(Acknowledgement::new("group deleted")),
    );
    Ok(response.into_response())
}

/// Append a player to the group roster. Requires a group session.
#[utoipa::path(
    post,
    path = "/groups/{id}/players",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    request_body = AddPlayerRequest,
    responses(
        (status = 200, description = "Roster extended", body = GroupSummary),
        (status = 400, description = "Empty, oversized, or duplicate name"),
        (status = 401, description = "No valid session for this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn add_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<AddPlayerRequest>,
) -> Result<Json<GroupSummary>, AppError> {
    session::ensure_group_access(&state, &headers, id)?;
    let summary = group_service::add_player(&state, id, &payload.player_name).await?;
    Ok(Json(summary))
}

/// Record a new game in the group. Requires a group session.
#[utoipa::path(
    post,
    path = "/groups/{id}/games",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSummary),
        (status = 400, description = "Name outside the roster or fewer than two players"),
        (status = 401, description = "No valid session for this group"),
        (status = 404, description = "Group not found")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<GameSummary>, AppError> {
    session::ensure_group_access(&state, &headers, id)?;
    payload.validate()?;
    let summary = game_service::create_game(&state, id, payload).await?;
    Ok(Json(summary))
}

/// Verify a group password and set the session cookie on success.
#[utoipa::path(
    post,
    path = "/groups/{id}/verify-password",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    request_body = VerifyPasswordRequest,
    responses(
        (status = 200, description = "Password accepted, session granted", body = Acknowledgement),
        (status = 401, description = "Password rejected")
    )
)]
pub async fn verify_password(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyPasswordRequest>,
) -> Result<Response, AppError> {
    let valid = group_service::verify_group_password(&state, id, &payload.password).await?;
    if !valid {
        return Err(AppError::Unauthorized("incorrect password".into()));
    }

    let response = (
        StatusCode::OK,
        [(header::SET_COOKIE, session::grant_cookie(&state, id))],
        Json(Acknowledgement::new("password accepted")),
    );
    Ok(response.into_response())
}

/// Drop the caller's session for this group.
#[utoipa::path(
    post,
    path = "/groups/{id}/logout",
    tag = "groups",
    params(("id" = Uuid, Path, description = "Group identifier")),
    responses((status = 200, description = "Session revoked", body = Acknowledgement))
)]
pub async fn logout(Path(id): Path<Uuid>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session::revoke_cookie(id))],
        Json(Acknowledgement::new("logged out")),
    )
        .into_response()
}
