//! Session coordination: one handler per game WebSocket message.
//!
//! Every handler locks the room authority, applies the mutation, and fans the
//! resulting events out while still holding the guard, so frames reach
//! sockets in the order the mutations were applied. Broadcast queueing never
//! blocks, which keeps that critical section short.

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::validation::{normalize_player_name, normalize_room_code};
use crate::dto::ws::{ClientMessage, JoinRoomRequest, ServerMessage};
use crate::error::JoinError;
use crate::services::room_events;
use crate::services::socket_service::send_to_socket;
use crate::state::registry::{MoveOutcome, RoomDeparture};
use crate::state::{RoomMember, SharedState};

/// Route one parsed client message to its handler.
pub async fn dispatch(
    state: &SharedState,
    socket_id: Uuid,
    tx: &mpsc::UnboundedSender<Message>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::CreateRoom => create_room(state, tx).await,
        ClientMessage::JoinRoom { request } => join_room(state, socket_id, tx, request).await,
        ClientMessage::StartGame { room_code } => start_game(state, socket_id, &room_code).await,
        ClientMessage::RollDice {
            room_code,
            player_id,
        } => roll_dice(state, &room_code, player_id).await,
        ClientMessage::CompleteCard { room_code } => complete_card(state, &room_code).await,
        ClientMessage::Unknown => {
            warn!(id = %socket_id, "ignoring unknown client message type");
        }
    }
}

/// Open a fresh room and reply with its join code.
///
/// The requester is not seated yet; like everyone else they claim their seat
/// (and the host role, if first) through `joinRoom`.
async fn create_room(state: &SharedState, tx: &mpsc::UnboundedSender<Message>) {
    let mut rooms = state.rooms().lock().await;
    let code = rooms.create();
    info!(code = %code, "room created");
    send_to_socket(tx, &ServerMessage::RoomCreated { room_code: code });
}

/// Validate a join request, seat the player, and tell everyone.
async fn join_room(
    state: &SharedState,
    socket_id: Uuid,
    tx: &mpsc::UnboundedSender<Message>,
    request: JoinRoomRequest,
) {
    if let Err(errors) = request.validate() {
        // A name problem is its own refusal; a malformed code can only ever
        // name a room that does not exist.
        let error = if errors.field_errors().contains_key("player_name") {
            JoinError::InvalidName
        } else {
            JoinError::RoomNotFound
        };
        warn!(id = %socket_id, %error, "join request failed validation");
        send_to_socket(tx, &join_refusal(error));
        return;
    }

    let code = normalize_room_code(&request.room_code);
    let name = normalize_player_name(&request.player_name);

    let mut rooms = state.rooms().lock().await;
    match rooms.join(&code, socket_id, &name) {
        Ok(outcome) => {
            // Seat the socket before the roster broadcast so the joiner sees
            // their own arrival, exactly as the rest of the room does.
            state.hub().join(
                &code,
                RoomMember {
                    id: socket_id,
                    tx: tx.clone(),
                },
            );
            room_events::broadcast_player_joined(
                state,
                &code,
                &outcome.room.players,
                outcome.room.host_id,
            );
            info!(code = %code, id = %socket_id, name = %outcome.player.name, "player joined");
            send_to_socket(
                tx,
                &ServerMessage::RoomJoined {
                    player: (&outcome.player).into(),
                    room: (&outcome.room).into(),
                    is_host: outcome.is_host,
                },
            );
        }
        Err(error) => {
            warn!(code = %code, id = %socket_id, %error, "join refused");
            send_to_socket(tx, &join_refusal(error));
        }
    }
}

/// Start the game when the requester holds the host seat with a quorum.
async fn start_game(state: &SharedState, socket_id: Uuid, room_code: &str) {
    let code = normalize_room_code(room_code);
    let mut rooms = state.rooms().lock().await;
    match rooms.start_game(&code, socket_id) {
        Some(room) => {
            info!(code = %code, players = room.players.len(), "game started");
            room_events::broadcast_game_started(state, &room);
        }
        None => {
            warn!(code = %code, id = %socket_id, "ignoring start request");
        }
    }
}

/// Record a move for the player claiming the turn.
async fn roll_dice(state: &SharedState, room_code: &str, player_id: Uuid) {
    let code = normalize_room_code(room_code);
    let mut rooms = state.rooms().lock().await;
    match rooms.record_move(&code, player_id) {
        Some(outcome) => {
            if let MoveOutcome::Won { winner } = &outcome {
                info!(code = %code, winner = %winner.id, "game won");
            }
            room_events::broadcast_move(state, &code, outcome);
        }
        None => {
            warn!(code = %code, id = %player_id, "ignoring out-of-turn or misaddressed roll");
        }
    }
}

/// Dismiss the pending card for everyone in the room.
async fn complete_card(state: &SharedState, room_code: &str) {
    let code = normalize_room_code(room_code);
    let mut rooms = state.rooms().lock().await;
    if rooms.acknowledge_card(&code) {
        room_events::broadcast_card_completed(state, &code);
    } else {
        warn!(code = %code, "ignoring card completion for an unknown room");
    }
}

/// Sweep a closed connection out of every room and notify the remainders.
pub async fn disconnect(state: &SharedState, socket_id: Uuid) {
    // Unseat the socket first so it cannot receive its own departure.
    state.hub().leave_all(socket_id);

    let mut rooms = state.rooms().lock().await;
    for departure in rooms.disconnect(socket_id) {
        match departure {
            RoomDeparture::Remaining {
                code,
                players,
                left_player_id,
                new_host_id,
            } => {
                info!(code = %code, id = %socket_id, "player left");
                room_events::broadcast_player_left(
                    state,
                    &code,
                    &players,
                    left_player_id,
                    new_host_id,
                );
            }
            RoomDeparture::Emptied { code } => {
                info!(code = %code, "room emptied and removed");
            }
        }
    }
}

fn join_refusal(error: JoinError) -> ServerMessage {
    ServerMessage::Error {
        code: error.code().to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::Value;

    use crate::config::AppConfig;
    use crate::state::AppState;
    use crate::state::board;
    use crate::state::registry::MemoryRooms;

    fn seeded_state(seed: u64) -> SharedState {
        let config = Arc::new(AppConfig::default());
        let authority = MemoryRooms::with_rng(config.clone(), StdRng::seed_from_u64(seed));
        AppState::new(config, Box::new(authority))
    }

    fn open_socket() -> (
        Uuid,
        mpsc::UnboundedSender<Message>,
        mpsc::UnboundedReceiver<Message>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Uuid::new_v4(), tx, rx)
    }

    fn next_frame(rx: &mut mpsc::UnboundedReceiver<Message>) -> Value {
        match rx.try_recv() {
            Ok(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a queued text frame, got {other:?}"),
        }
    }

    fn no_frame(rx: &mut mpsc::UnboundedReceiver<Message>) -> bool {
        rx.try_recv().is_err()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Message>) {
        while rx.try_recv().is_ok() {}
    }

    fn join(code: &str, name: &str) -> ClientMessage {
        ClientMessage::JoinRoom {
            request: JoinRoomRequest {
                room_code: code.to_string(),
                player_name: name.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn full_session_from_create_to_first_move() {
        let state = seeded_state(42);
        let (alice, alice_tx, mut alice_rx) = open_socket();
        let (bob, bob_tx, mut bob_rx) = open_socket();

        dispatch(&state, alice, &alice_tx, ClientMessage::CreateRoom).await;
        let created = next_frame(&mut alice_rx);
        assert_eq!(created["type"], "roomCreated");
        let code = created["roomCode"].as_str().unwrap().to_string();

        // Codes are matched case-insensitively and names are trimmed.
        dispatch(&state, alice, &alice_tx, join(&code.to_lowercase(), " Alice ")).await;
        let roster = next_frame(&mut alice_rx);
        assert_eq!(roster["type"], "playerJoined");
        assert_eq!(roster["hostId"], alice.to_string());
        assert_eq!(roster["players"].as_array().unwrap().len(), 1);

        let reply = next_frame(&mut alice_rx);
        assert_eq!(reply["type"], "roomJoined");
        assert_eq!(reply["isHost"], true);
        assert_eq!(reply["player"]["name"], "Alice");
        assert_eq!(reply["player"]["position"], 0);
        assert_eq!(reply["room"]["code"], code);

        dispatch(&state, bob, &bob_tx, join(&code, "Bob")).await;
        let roster = next_frame(&mut alice_rx);
        assert_eq!(roster["type"], "playerJoined");
        assert_eq!(roster["players"].as_array().unwrap().len(), 2);
        let roster = next_frame(&mut bob_rx);
        assert_eq!(roster["type"], "playerJoined");
        let reply = next_frame(&mut bob_rx);
        assert_eq!(reply["type"], "roomJoined");
        assert_eq!(reply["isHost"], false);
        assert_ne!(
            reply["player"]["color"],
            state.config().marker_for(0).as_str()
        );

        // Only the host may start.
        dispatch(
            &state,
            bob,
            &bob_tx,
            ClientMessage::StartGame {
                room_code: code.clone(),
            },
        )
        .await;
        assert!(no_frame(&mut alice_rx));
        assert!(no_frame(&mut bob_rx));

        dispatch(
            &state,
            alice,
            &alice_tx,
            ClientMessage::StartGame {
                room_code: code.clone(),
            },
        )
        .await;
        let started = next_frame(&mut alice_rx);
        assert_eq!(started["type"], "gameStarted");
        assert_eq!(started["gameStarted"], true);
        assert_eq!(started["code"], code);
        assert_eq!(next_frame(&mut bob_rx)["type"], "gameStarted");

        // Bob cannot move on Alice's turn.
        dispatch(
            &state,
            bob,
            &bob_tx,
            ClientMessage::RollDice {
                room_code: code.clone(),
                player_id: bob,
            },
        )
        .await;
        assert!(no_frame(&mut alice_rx));
        assert!(no_frame(&mut bob_rx));

        dispatch(
            &state,
            alice,
            &alice_tx,
            ClientMessage::RollDice {
                room_code: code.clone(),
                player_id: alice,
            },
        )
        .await;
        let rolled = next_frame(&mut alice_rx);
        assert_eq!(rolled["type"], "diceRolled");
        assert_eq!(rolled["playerId"], alice.to_string());
        assert_eq!(rolled["nextPlayerId"], bob.to_string());
        let die = rolled["diceValue"].as_u64().unwrap();
        assert!((1..=6).contains(&die));
        assert_eq!(rolled["newPosition"], die);
        let landed = board::island_color(u32::try_from(die).unwrap());
        assert_eq!(rolled["card"].is_null(), !landed.draws_card());
        assert_eq!(next_frame(&mut bob_rx)["type"], "diceRolled");
    }

    #[tokio::test]
    async fn join_refusals_reach_only_the_requester() {
        let state = seeded_state(7);
        let (alice, alice_tx, mut alice_rx) = open_socket();

        dispatch(&state, alice, &alice_tx, join("ZZZZZZ", "Alice")).await;
        let refusal = next_frame(&mut alice_rx);
        assert_eq!(refusal["type"], "error");
        assert_eq!(refusal["code"], "roomNotFound");
        assert_eq!(refusal["message"], "Room not found");

        dispatch(&state, alice, &alice_tx, ClientMessage::CreateRoom).await;
        let code = next_frame(&mut alice_rx)["roomCode"]
            .as_str()
            .unwrap()
            .to_string();

        dispatch(&state, alice, &alice_tx, join(&code, "   ")).await;
        let refusal = next_frame(&mut alice_rx);
        assert_eq!(refusal["type"], "error");
        assert_eq!(refusal["code"], "invalidName");
        assert!(no_frame(&mut alice_rx));
    }

    #[tokio::test]
    async fn card_completion_is_broadcast_to_the_whole_room() {
        let state = seeded_state(11);
        let (alice, alice_tx, mut alice_rx) = open_socket();
        let (bob, bob_tx, mut bob_rx) = open_socket();

        dispatch(&state, alice, &alice_tx, ClientMessage::CreateRoom).await;
        let code = next_frame(&mut alice_rx)["roomCode"]
            .as_str()
            .unwrap()
            .to_string();
        dispatch(&state, alice, &alice_tx, join(&code, "Alice")).await;
        dispatch(&state, bob, &bob_tx, join(&code, "Bob")).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        dispatch(
            &state,
            bob,
            &bob_tx,
            ClientMessage::CompleteCard {
                room_code: code.clone(),
            },
        )
        .await;
        assert_eq!(next_frame(&mut alice_rx)["type"], "cardCompleted");
        assert_eq!(next_frame(&mut bob_rx)["type"], "cardCompleted");

        dispatch(
            &state,
            bob,
            &bob_tx,
            ClientMessage::CompleteCard {
                room_code: "ZZZZZZ".to_string(),
            },
        )
        .await;
        assert!(no_frame(&mut alice_rx));
        assert!(no_frame(&mut bob_rx));
    }

    #[tokio::test]
    async fn disconnects_pass_the_host_seat_and_finally_remove_the_room() {
        let state = seeded_state(13);
        let (alice, alice_tx, mut alice_rx) = open_socket();
        let (bob, bob_tx, mut bob_rx) = open_socket();

        dispatch(&state, alice, &alice_tx, ClientMessage::CreateRoom).await;
        let code = next_frame(&mut alice_rx)["roomCode"]
            .as_str()
            .unwrap()
            .to_string();
        dispatch(&state, alice, &alice_tx, join(&code, "Alice")).await;
        dispatch(&state, bob, &bob_tx, join(&code, "Bob")).await;
        drain(&mut alice_rx);
        drain(&mut bob_rx);

        disconnect(&state, alice).await;
        let left = next_frame(&mut bob_rx);
        assert_eq!(left["type"], "playerLeft");
        assert_eq!(left["leftPlayerId"], alice.to_string());
        assert_eq!(left["newHostId"], bob.to_string());
        assert_eq!(left["players"].as_array().unwrap().len(), 1);
        assert!(no_frame(&mut alice_rx));

        disconnect(&state, bob).await;
        assert!(no_frame(&mut bob_rx));
        assert!(state.rooms().lock().await.room(&code).is_none());
    }
}
