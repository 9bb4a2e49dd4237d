//! Fan-out of server events to the sockets seated in a room.

use axum::extract::ws::{Message, Utf8Bytes};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

/// Handle used to push messages to one connected socket.
#[derive(Clone)]
pub struct RoomMember {
    /// Connection identifier, doubling as the player id.
    pub id: Uuid,
    /// Writer-task queue of the member's socket.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Registry of which sockets sit in which room.
///
/// Membership mirrors the authority's rosters but carries the transport
/// handles the authority never sees. Entries disappear with their last
/// member.
#[derive(Default)]
pub struct RoomHub {
    members: DashMap<String, Vec<RoomMember>>,
}

impl RoomHub {
    /// Empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a socket in a room's delivery list.
    pub fn join(&self, code: &str, member: RoomMember) {
        self.members.entry(code.to_owned()).or_default().push(member);
    }

    /// Remove a socket from every room it sits in.
    pub fn leave_all(&self, id: Uuid) {
        self.members.retain(|_, members| {
            members.retain(|member| member.id != id);
            !members.is_empty()
        });
    }

    /// Serialize `payload` once and queue it on every member of the room.
    ///
    /// A member whose writer task already hung up just misses the frame; the
    /// disconnect sweep clears the seat moments later.
    pub fn broadcast<T: Serialize>(&self, code: &str, payload: &T, context: &str) {
        let text = match serde_json::to_string(payload) {
            Ok(text) => Utf8Bytes::from(text),
            Err(error) => {
                warn!(%error, context, "failed to serialize room broadcast");
                return;
            }
        };

        let Some(members) = self.members.get(code) else {
            return;
        };
        for member in members.iter() {
            let _ = member.tx.send(Message::Text(text.clone()));
        }
    }
}
