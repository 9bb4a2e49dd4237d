use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::health::HealthResponse, state::SharedState};

#[utoipa::path(
    get,
    path = "/healthcheck",
    responses((status = 200, description = "Service is up, with the live room count", body = HealthResponse))
)]
/// Return the current health status and the number of live rooms.
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    let rooms = state.rooms().lock().await.room_count();
    Json(HealthResponse::ok(rooms))
}

/// Configure the liveness probe route.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/healthcheck", get(healthcheck))
}
