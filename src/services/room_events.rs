//! Builders for the events fanned out to a whole room.

use uuid::Uuid;

use crate::dto::ws::ServerMessage;
use crate::state::SharedState;
use crate::state::registry::MoveOutcome;
use crate::state::room::{Player, Room};

/// Tell the whole room somebody took a seat.
pub fn broadcast_player_joined(
    state: &SharedState,
    code: &str,
    players: &[Player],
    host_id: Option<Uuid>,
) {
    let message = ServerMessage::PlayerJoined {
        players: players.iter().map(Into::into).collect(),
        host_id,
    };
    state.hub().broadcast(code, &message, "playerJoined");
}

/// Tell the whole room the game started, with the snapshot to render from.
pub fn broadcast_game_started(state: &SharedState, room: &Room) {
    let message = ServerMessage::GameStarted { room: room.into() };
    state.hub().broadcast(&room.code, &message, "gameStarted");
}

/// Tell the whole room what a recorded move did: either the game is won, or
/// the turn passed on (with the drawn card, if the landing tile has one).
pub fn broadcast_move(state: &SharedState, code: &str, outcome: MoveOutcome) {
    let (message, context) = match outcome {
        MoveOutcome::Won { winner } => (
            ServerMessage::GameWon {
                winner: (&winner).into(),
            },
            "gameWon",
        ),
        MoveOutcome::Moved {
            player_id,
            die,
            position,
            next_player_id,
            card,
        } => (
            ServerMessage::DiceRolled {
                player_id,
                dice_value: die,
                new_position: position,
                next_player_id,
                card,
            },
            "diceRolled",
        ),
    };
    state.hub().broadcast(code, &message, context);
}

/// Tell the whole room the pending card was dismissed.
pub fn broadcast_card_completed(state: &SharedState, code: &str) {
    state
        .hub()
        .broadcast(code, &ServerMessage::CardCompleted, "cardCompleted");
}

/// Tell the remaining players somebody left and who hosts now.
pub fn broadcast_player_left(
    state: &SharedState,
    code: &str,
    players: &[Player],
    left_player_id: Uuid,
    new_host_id: Option<Uuid>,
) {
    let message = ServerMessage::PlayerLeft {
        players: players.iter().map(Into::into).collect(),
        left_player_id,
        new_host_id,
    };
    state.hub().broadcast(code, &message, "playerLeft");
}
