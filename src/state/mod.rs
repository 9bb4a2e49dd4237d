//! Shared application state: configuration, the room authority, and the
//! per-room delivery hub.

pub mod board;
pub mod catalog;
mod hub;
pub mod registry;
pub mod room;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::state::registry::RoomAuthority;

pub use self::hub::{RoomHub, RoomMember};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the room registry and the socket hub.
pub struct AppState {
    config: Arc<AppConfig>,
    rooms: Mutex<Box<dyn RoomAuthority>>,
    hub: RoomHub,
}

impl AppState {
    /// Construct the state around an injected room authority, wrapped in an
    /// [`Arc`] so handlers can clone it cheaply.
    pub fn new(config: Arc<AppConfig>, authority: Box<dyn RoomAuthority>) -> SharedState {
        Arc::new(Self {
            config,
            rooms: Mutex::new(authority),
            hub: RoomHub::new(),
        })
    }

    /// Game configuration the rooms run under.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Authority that owns every live room.
    ///
    /// Handlers hold the guard across a mutation and its broadcasts so room
    /// events reach sockets in the order they were applied.
    pub fn rooms(&self) -> &Mutex<Box<dyn RoomAuthority>> {
        &self.rooms
    }

    /// Delivery hub mapping room codes to connected sockets.
    pub fn hub(&self) -> &RoomHub {
        &self.hub
    }
}
