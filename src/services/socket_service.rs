//! WebSocket connection lifecycle for game clients.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::ws::{ClientMessage, ServerMessage};
use crate::services::room_service;
use crate::state::SharedState;

/// Handle the full lifecycle for an individual game WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    // The connection id doubles as the player id once the client takes a seat.
    let connection_id = Uuid::new_v4();
    info!(id = %connection_id, "client connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(message) => {
                    room_service::dispatch(&state, connection_id, &outbound_tx, message).await;
                }
                Err(err) => {
                    warn!(id = %connection_id, error = %err, "failed to parse client message");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(id = %connection_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    room_service::disconnect(&state, connection_id).await;
    info!(id = %connection_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Serialize a reply and queue it on the connection's writer task.
///
/// Failures are logged and swallowed: a closed writer means the read loop is
/// about to run the disconnect sweep anyway.
pub(crate) fn send_to_socket(tx: &mpsc::UnboundedSender<Message>, message: &ServerMessage) {
    match serde_json::to_string(message) {
        Ok(payload) => {
            if tx.send(Message::Text(payload.into())).is_err() {
                warn!("websocket writer dropped while queueing a reply");
            }
        }
        Err(err) => warn!(error = %err, "failed to serialize server message"),
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
