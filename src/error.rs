//! Domain errors surfaced over the room protocol.

use thiserror::Error;

/// Reasons a join attempt is refused.
///
/// These are the only errors the protocol ever surfaces to a client; every
/// other rejected action (unauthorized start, out-of-turn roll, action on an
/// unknown room) is dropped silently. Display strings match what the web
/// client shows verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinError {
    /// No live room matches the requested code.
    #[error("Room not found")]
    RoomNotFound,
    /// The roster already holds the maximum number of players.
    #[error("Room is full")]
    RoomFull,
    /// The host has already started the game; the roster is closed.
    #[error("Game already started")]
    AlreadyStarted,
    /// The requested display name is empty or too long.
    #[error("Invalid player name")]
    InvalidName,
}

impl JoinError {
    /// Machine-readable code carried in the error reply alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "roomNotFound",
            Self::RoomFull => "roomFull",
            Self::AlreadyStarted => "alreadyStarted",
            Self::InvalidName => "invalidName",
        }
    }
}
