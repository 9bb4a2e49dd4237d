use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Journey Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
            crate::dto::ws::JoinRoomRequest,
            crate::dto::room::PlayerSnapshot,
            crate::dto::room::RoomSnapshot,
            crate::state::catalog::Card,
            crate::state::board::IslandColor,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rooms", description = "WebSocket operations for game clients"),
    )
)]
pub struct ApiDoc;
