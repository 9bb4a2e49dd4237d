//! Journey Back binary entrypoint wiring the REST, WebSocket, and static
//! asset layers around the in-memory room registry.

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use journey_back::config::AppConfig;
use journey_back::routes;
use journey_back::state::registry::MemoryRooms;
use journey_back::state::{AppState, SharedState};

/// Environment variable pointing at the built game client.
const STATIC_DIR_ENV: &str = "JOURNEY_BACK_STATIC_DIR";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Arc::new(AppConfig::load());
    let app_state = AppState::new(config.clone(), Box::new(MemoryRooms::new(config)));
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port()));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Listen port from `PORT` or `SERVER_PORT`, defaulting to 3001.
fn listen_port() -> u16 {
    env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001)
}

/// Attach the cross-cutting middleware layers to the route tree.
///
/// Paths outside the API fall through to the static game client so that
/// client-side routes survive a refresh.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .fallback_service(spa_service())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Static file service for the built game client, answering unknown paths
/// with the index page.
fn spa_service() -> ServeDir<ServeFile> {
    let dist = env::var(STATIC_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("dist"));
    let index = dist.join("index.html");
    ServeDir::new(dist).not_found_service(ServeFile::new(index))
}

/// Install the tracing subscriber the whole process logs through.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve once Ctrl+C or SIGTERM arrives, letting in-flight requests finish.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
