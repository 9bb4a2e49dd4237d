use axum::Router;

use crate::state::SharedState;

pub mod docs;
pub mod health;
pub mod websocket;

/// Compose the route trees and attach the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(websocket::router())
        .merge(docs::router(state.clone()))
        .with_state(state)
}
