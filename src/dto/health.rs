use serde::Serialize;
use utoipa::ToSchema;

/// Liveness payload for the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok": the process holds no external connections to degrade.
    pub status: String,
    /// Number of live rooms in the registry.
    pub rooms: usize,
}

impl HealthResponse {
    /// Build the healthy response with the current room count.
    pub fn ok(rooms: usize) -> Self {
        Self {
            status: "ok".to_string(),
            rooms,
        }
    }
}
