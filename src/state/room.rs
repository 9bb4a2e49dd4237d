//! Mutable state of one game session and the pure mutations applied to it.
//!
//! Everything here is transport-free: the coordinator decides *when* these
//! mutations run and what to broadcast afterwards, the room only decides
//! *whether* they apply and what changed.

use uuid::Uuid;

use crate::error::JoinError;
use crate::state::board::{self, IslandColor};
use crate::state::catalog::Card;

/// Seats available in a room; also the size of the marker palette.
pub const MAX_PLAYERS: usize = 6;

/// One seated player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Connection id minted by the transport when the socket was accepted.
    pub id: Uuid,
    /// Display name, not required to be unique.
    pub name: String,
    /// Track position; 0 at join, clamped to the track length.
    pub position: u32,
    /// Marker color assigned by join order.
    pub color: String,
}

/// Mutable state of one game session.
///
/// The roster is ordered: join order is turn order. The room moves through
/// lobby (not started) → in progress → won; `game_started` never reverts and
/// a won room persists until its last player leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    /// Code the room is registered under.
    pub code: String,
    /// Seated players in join order.
    pub players: Vec<Player>,
    /// Player allowed to start the game; the first joiner, reassigned on
    /// departure. `None` only while the roster is empty.
    pub host_id: Option<Uuid>,
    /// Index into `players` of the player whose turn it is.
    pub current_player_index: usize,
    /// Set once the host starts the game.
    pub game_started: bool,
    /// Terminal flag set by a winning roll.
    pub has_won: bool,
    /// Player whose move ended the game.
    pub winner: Option<Player>,
    /// Prompt waiting to be acknowledged, if any.
    pub current_card: Option<Card>,
}

/// Result of a roll the room accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum RollOutcome {
    /// The mover reached the end of the track; the game is over.
    Won {
        /// Player whose move ended the game, position already updated.
        winner: Player,
    },
    /// An ordinary move; the turn passed to the next seat.
    Moved {
        /// Player who rolled.
        player_id: Uuid,
        /// Die value rolled.
        die: u8,
        /// Position after the clamped advance.
        position: u32,
        /// Player who rolls next.
        next_player_id: Uuid,
        /// Color of the tile landed on.
        color: IslandColor,
    },
}

/// Roster effect of removing a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// No players remain; the room should be deleted.
    Emptied,
    /// Players remain; broadcast the new roster under this host.
    Remaining {
        /// Host after the removal (reassigned if the host departed).
        new_host_id: Option<Uuid>,
    },
}

impl Room {
    /// Fresh room in the lobby state, registered under `code`.
    pub fn new(code: String) -> Self {
        Self {
            code,
            players: Vec::new(),
            host_id: None,
            current_player_index: 0,
            game_started: false,
            has_won: false,
            winner: None,
            current_card: None,
        }
    }

    /// Seat a new player with the given marker color.
    ///
    /// Fails when the roster is full or the game has already started; a room
    /// that is both reports full. The first player to sit down claims the
    /// host seat.
    pub fn add_player(&mut self, id: Uuid, name: String, color: String) -> Result<&Player, JoinError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(JoinError::RoomFull);
        }
        if self.game_started {
            return Err(JoinError::AlreadyStarted);
        }

        self.players.push(Player {
            id,
            name,
            position: 0,
            color,
        });
        if self.host_id.is_none() {
            self.host_id = Some(id);
        }

        let seat = self.players.len() - 1;
        Ok(&self.players[seat])
    }

    /// Start the game.
    ///
    /// Silently refused unless `requester` is the host and at least two
    /// players are seated. Returns whether the room is started, so a repeat
    /// call by the host re-reports `true` (and the caller re-broadcasts)
    /// without changing state.
    pub fn start(&mut self, requester: Uuid) -> bool {
        if self.host_id != Some(requester) || self.players.len() < 2 {
            return false;
        }
        self.game_started = true;
        true
    }

    /// Player whose turn it is, when the roster is non-empty.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Resolve a die roll by `player_id`.
    ///
    /// Out-of-turn rolls (and rolls against an empty roster) change nothing
    /// and return `None`; turn enforcement is the one gameplay-level guard.
    /// A winning roll records the winner and leaves the turn pointer where it
    /// is; any other roll advances it to the next seat.
    pub fn apply_roll(&mut self, player_id: Uuid, die: u8) -> Option<RollOutcome> {
        let index = self.current_player_index;
        let current = self.players.get(index)?;
        if current.id != player_id {
            return None;
        }

        let position = board::advance(current.position, die);
        self.players[index].position = position;

        let next_index = (index + 1) % self.players.len();
        let next_player_id = self.players[next_index].id;

        if board::is_winning(position) {
            let winner = self.players[index].clone();
            self.has_won = true;
            self.winner = Some(winner.clone());
            Some(RollOutcome::Won { winner })
        } else {
            self.current_player_index = next_index;
            Some(RollOutcome::Moved {
                player_id,
                die,
                position,
                next_player_id,
                color: board::island_color(position),
            })
        }
    }

    /// Remove a departing connection from the roster.
    ///
    /// Returns `None` when the connection is not seated here. The host seat
    /// passes to the first remaining player. When the departing seat was at
    /// or before the turn pointer, the pointer is reduced modulo the shrunken
    /// roster, which can hand the turn to a different seat than a plain
    /// shift would.
    pub fn remove_player(&mut self, id: Uuid) -> Option<Departure> {
        let index = self.players.iter().position(|player| player.id == id)?;
        self.players.remove(index);

        if self.host_id == Some(id) && !self.players.is_empty() {
            self.host_id = Some(self.players[0].id);
        }

        if self.players.is_empty() {
            return Some(Departure::Emptied);
        }

        if index <= self.current_player_index {
            self.current_player_index %= self.players.len();
        }

        Some(Departure::Remaining {
            new_host_id: self.host_id,
        })
    }
}
