use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the 421 scorekeeping backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::events_stream,
        crate::routes::groups::list_groups,
        crate::routes::groups::create_group,
        crate::routes::groups::get_group,
        crate::routes::groups::delete_group,
        crate::routes::groups::add_player,
        crate::routes::groups::create_game,
        crate::routes::groups::verify_password,
        crate::routes::groups::logout,
        crate::routes::games::get_game,
        crate::routes::games::delete_game,
        crate::routes::games::update_player_status,
        crate::routes::games::adjust_player_stat,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::Acknowledgement,
            crate::dto::group::CreateGroupRequest,
            crate::dto::group::AddPlayerRequest,
            crate::dto::group::VerifyPasswordRequest,
            crate::dto::group::GroupSummary,
            crate::dto::group::GroupDetail,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::PlayerStatusRequest,
            crate::dto::game::AdjustStatRequest,
            crate::dto::game::StatKind,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::GameWithGroup,
            crate::dto::sse::Handshake,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "groups", description = "Group lifecycle, roster, and sessions"),
        (name = "games", description = "Game lookup and per-player mutations"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
