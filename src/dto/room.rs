//! Wire projections of rooms and players.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::catalog::Card;
use crate::state::room::{Player, Room};

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Public projection of a seated player.
pub struct PlayerSnapshot {
    /// Player identifier, minted from the connection.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Tile index on the track, 0 for the start.
    pub position: u32,
    /// Marker color assigned by join order.
    pub color: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Public projection of a room, sent whenever clients need the whole picture.
///
/// Absent optionals serialize as explicit `null`s so clients can reset state
/// off a single snapshot.
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Join code the room is registered under.
    pub code: String,
    /// Seated players in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Player currently holding the host seat.
    pub host_id: Option<Uuid>,
    /// Index into `players` of whoever rolls next.
    pub current_player_index: usize,
    /// Whether the host has started the game.
    pub game_started: bool,
    /// Whether somebody already reached the end of the track.
    pub has_won: bool,
    /// The player who won, once `has_won` is set.
    pub winner: Option<PlayerSnapshot>,
    /// Prompt drawn by the latest move, until it is completed.
    pub current_card: Option<Card>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            position: player.position,
            color: player.color.clone(),
        }
    }
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.clone(),
            players: room.players.iter().map(Into::into).collect(),
            host_id: room.host_id,
            current_player_index: room.current_player_index,
            game_started: room.game_started,
            has_won: room.has_won,
            winner: room.winner.as_ref().map(Into::into),
            current_card: room.current_card.clone(),
        }
    }
}
