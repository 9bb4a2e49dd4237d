//! Messages exchanged with game WebSocket clients.
//!
//! Frames are JSON objects tagged by a `type` field, with camelCase payload
//! keys throughout.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::room::{PlayerSnapshot, RoomSnapshot};
use crate::dto::validation::{validate_player_name, validate_room_code};
use crate::state::catalog::Card;

#[derive(Debug, Deserialize, Serialize, ToSchema, PartialEq)]
/// Messages accepted from game WebSocket clients.
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Open a fresh room and reply with its code.
    #[serde(rename = "createRoom")]
    CreateRoom,
    /// Take a seat in an existing room.
    #[serde(rename = "joinRoom")]
    JoinRoom {
        /// Join payload, validated before the room is touched.
        #[serde(flatten)]
        request: JoinRoomRequest,
    },
    /// Host request to start the game.
    #[serde(rename = "startGame", rename_all = "camelCase")]
    StartGame {
        /// Code of the room to start.
        room_code: String,
    },
    /// Roll the die for the asserted player's turn.
    #[serde(rename = "rollDice", rename_all = "camelCase")]
    RollDice {
        /// Code of the room the player sits in.
        room_code: String,
        /// Player claiming the turn; must match the seat the turn points at.
        player_id: Uuid,
    },
    /// Acknowledge the pending prompt card.
    #[serde(rename = "completeCard", rename_all = "camelCase")]
    CompleteCard {
        /// Code of the room holding the card.
        room_code: String,
    },
    /// Any message type this server does not understand.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Serialize, ToSchema, PartialEq)]
/// Payload of a `joinRoom` message.
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    /// Code of the room to join, in either case.
    pub room_code: String,
    /// Display name to take the seat under.
    pub player_name: String,
}

impl Validate for JoinRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_room_code(&self.room_code) {
            errors.add("room_code", e);
        }

        if let Err(e) = validate_player_name(&self.player_name) {
            errors.add("player_name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Messages pushed to game WebSocket clients.
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Reply to `createRoom` carrying the fresh join code.
    #[serde(rename = "roomCreated", rename_all = "camelCase")]
    RoomCreated {
        /// Code other players join with.
        room_code: String,
    },
    /// Reply to a successful `joinRoom`.
    #[serde(rename = "roomJoined", rename_all = "camelCase")]
    RoomJoined {
        /// The seat the sender now holds.
        player: PlayerSnapshot,
        /// Snapshot of the whole room.
        room: RoomSnapshot,
        /// Whether the sender holds the host seat.
        is_host: bool,
    },
    /// Reply to a request this server refused.
    #[serde(rename = "error")]
    Error {
        /// Stable machine-readable reason.
        code: String,
        /// Human-readable description.
        message: String,
    },
    /// Somebody took a seat; sent to everyone already in the room.
    #[serde(rename = "playerJoined", rename_all = "camelCase")]
    PlayerJoined {
        /// Roster after the join, in seating order.
        players: Vec<PlayerSnapshot>,
        /// Host after the join.
        host_id: Option<Uuid>,
    },
    /// The host started the game. The room snapshot rides at the top level of
    /// the frame, next to the tag.
    #[serde(rename = "gameStarted")]
    GameStarted {
        /// Snapshot of the room at the starting line.
        #[serde(flatten)]
        room: RoomSnapshot,
    },
    /// A move was recorded and the turn passed on.
    #[serde(rename = "diceRolled", rename_all = "camelCase")]
    DiceRolled {
        /// Player who rolled.
        player_id: Uuid,
        /// Die value rolled.
        dice_value: u8,
        /// Tile the player landed on.
        new_position: u32,
        /// Player who rolls next.
        next_player_id: Uuid,
        /// Prompt drawn for the landing tile; `null` on white tiles.
        card: Option<Card>,
    },
    /// A move reached the end of the track.
    #[serde(rename = "gameWon")]
    GameWon {
        /// The player who won.
        winner: PlayerSnapshot,
    },
    /// The pending prompt card was acknowledged.
    #[serde(rename = "cardCompleted")]
    CardCompleted,
    /// Somebody left; sent to everyone remaining in the room.
    #[serde(rename = "playerLeft", rename_all = "camelCase")]
    PlayerLeft {
        /// Roster after the departure.
        players: Vec<PlayerSnapshot>,
        /// Player who left.
        left_player_id: Uuid,
        /// Host after the departure, when one remains.
        new_host_id: Option<Uuid>,
    },
}
