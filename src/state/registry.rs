//! Room authority: the registry of live rooms and the capability interface
//! the coordinator drives it through.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::JoinError;
use crate::state::catalog::Card;
use crate::state::room::{Departure, Player, RollOutcome, Room};

/// Length of a room code.
const CODE_LENGTH: usize = 6;
/// Alphabet room codes draw from, uppercase letters and digits only.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Everything the requester learns from a successful join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// The newly seated player.
    pub player: Player,
    /// Snapshot of the room after the join.
    pub room: Room,
    /// Whether the joiner holds the host seat.
    pub is_host: bool,
}

/// Outcome of a recorded move, ready to broadcast.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The mover reached the end of the track.
    Won {
        /// Player whose move ended the game, position already updated.
        winner: Player,
    },
    /// An ordinary move; the turn passed on.
    Moved {
        /// Player who rolled.
        player_id: Uuid,
        /// Die value rolled.
        die: u8,
        /// Position after the move.
        position: u32,
        /// Player who rolls next.
        next_player_id: Uuid,
        /// Prompt drawn for the landing tile, when it has one.
        card: Option<Card>,
    },
}

/// Per-room outcome of a connection's departure.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomDeparture {
    /// Players remain; broadcast the new roster.
    Remaining {
        /// Room code.
        code: String,
        /// Roster after the removal.
        players: Vec<Player>,
        /// Connection that left.
        left_player_id: Uuid,
        /// Host after the removal.
        new_host_id: Option<Uuid>,
    },
    /// The departing player was the last one; the room was removed.
    Emptied {
        /// Code the room was registered under.
        code: String,
    },
}

/// Capability interface every room backing satisfies.
///
/// The coordinator only ever drives rooms through this trait. [`MemoryRooms`]
/// is the shipping implementation; a durable backing could replace it without
/// the coordinator noticing. Outcomes are owned so the trait stays
/// object-safe.
pub trait RoomAuthority: Send {
    /// Register an empty room and return its code.
    fn create(&mut self) -> String;

    /// Look up a room by code.
    fn room(&self, code: &str) -> Option<&Room>;

    /// Seat `socket_id` in the room under `name`, assigning the next marker
    /// color by join order.
    fn join(&mut self, code: &str, socket_id: Uuid, name: &str) -> Result<JoinOutcome, JoinError>;

    /// Start the game when `socket_id` holds the host seat and at least two
    /// players are seated; returns the snapshot to broadcast.
    fn start_game(&mut self, code: &str, socket_id: Uuid) -> Option<Room>;

    /// Roll the die for `player_id` and record the move, drawing a prompt for
    /// colored landings.
    fn record_move(&mut self, code: &str, player_id: Uuid) -> Option<MoveOutcome>;

    /// Clear the pending prompt; reports whether the room exists.
    fn acknowledge_card(&mut self, code: &str) -> bool;

    /// Remove a departing connection from every room that seats it, deleting
    /// rooms it leaves empty.
    fn disconnect(&mut self, socket_id: Uuid) -> Vec<RoomDeparture>;

    /// Number of live rooms.
    fn room_count(&self) -> usize;
}

/// In-memory room authority: the code→room map plus the pseudo-random source
/// used for room codes, die rolls, and card draws.
pub struct MemoryRooms {
    config: Arc<AppConfig>,
    rooms: HashMap<String, Room>,
    rng: StdRng,
}

impl MemoryRooms {
    /// Authority seeded from the operating system.
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Authority with a caller-controlled random source, so tests can pin
    /// room codes and die rolls.
    pub fn with_rng(config: Arc<AppConfig>, rng: StdRng) -> Self {
        Self {
            config,
            rooms: HashMap::new(),
            rng,
        }
    }

    /// Delete a room by code; idempotent.
    pub fn remove(&mut self, code: &str) {
        self.rooms.remove(code);
    }

    /// Generate a code not currently registered.
    ///
    /// The code space (36^6) dwarfs any realistic room count; the retry loop
    /// turns "unlikely to collide" into "never collides with a live code".
    fn generate_code(&mut self) -> String {
        loop {
            let code: String = (0..CODE_LENGTH)
                .map(|_| {
                    let index = self.rng.random_range(0..CODE_ALPHABET.len());
                    CODE_ALPHABET[index] as char
                })
                .collect();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

impl RoomAuthority for MemoryRooms {
    fn create(&mut self) -> String {
        let code = self.generate_code();
        self.rooms.insert(code.clone(), Room::new(code.clone()));
        code
    }

    fn room(&self, code: &str) -> Option<&Room> {
        self.rooms.get(code)
    }

    fn join(&mut self, code: &str, socket_id: Uuid, name: &str) -> Result<JoinOutcome, JoinError> {
        let room = self.rooms.get_mut(code).ok_or(JoinError::RoomNotFound)?;
        let color = self.config.marker_for(room.players.len());
        let player = room.add_player(socket_id, name.to_string(), color)?.clone();
        let is_host = room.host_id == Some(socket_id);
        Ok(JoinOutcome {
            player,
            room: room.clone(),
            is_host,
        })
    }

    fn start_game(&mut self, code: &str, socket_id: Uuid) -> Option<Room> {
        let room = self.rooms.get_mut(code)?;
        room.start(socket_id).then(|| room.clone())
    }

    fn record_move(&mut self, code: &str, player_id: Uuid) -> Option<MoveOutcome> {
        let room = self.rooms.get_mut(code)?;
        let die: u8 = self.rng.random_range(1..=6);

        match room.apply_roll(player_id, die)? {
            RollOutcome::Won { winner } => Some(MoveOutcome::Won { winner }),
            RollOutcome::Moved {
                player_id,
                die,
                position,
                next_player_id,
                color,
            } => {
                let card = self.config.catalog().draw(color, &mut self.rng);
                room.current_card = card.clone();
                Some(MoveOutcome::Moved {
                    player_id,
                    die,
                    position,
                    next_player_id,
                    card,
                })
            }
        }
    }

    fn acknowledge_card(&mut self, code: &str) -> bool {
        match self.rooms.get_mut(code) {
            Some(room) => {
                room.current_card = None;
                true
            }
            None => false,
        }
    }

    fn disconnect(&mut self, socket_id: Uuid) -> Vec<RoomDeparture> {
        let codes: Vec<String> = self.rooms.keys().cloned().collect();
        let mut departures = Vec::new();

        for code in codes {
            let Some(room) = self.rooms.get_mut(&code) else {
                continue;
            };
            match room.remove_player(socket_id) {
                None => {}
                Some(Departure::Emptied) => {
                    self.remove(&code);
                    departures.push(RoomDeparture::Emptied { code });
                }
                Some(Departure::Remaining { new_host_id }) => {
                    departures.push(RoomDeparture::Remaining {
                        code: code.clone(),
                        players: room.players.clone(),
                        left_player_id: socket_id,
                        new_host_id,
                    });
                }
            }
        }

        departures
    }

    fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::state::board;

    fn seeded_authority(seed: u64) -> MemoryRooms {
        MemoryRooms::with_rng(Arc::new(AppConfig::default()), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn create_then_get_returns_an_empty_lobby() {
        let mut authority = seeded_authority(1);
        let code = authority.create();

        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.bytes().all(|byte| CODE_ALPHABET.contains(&byte)));

        let room = authority.room(&code).unwrap();
        assert!(room.players.is_empty());
        assert_eq!(room.host_id, None);
        assert!(!room.game_started);
        assert_eq!(room.code, code);
    }

    #[test]
    fn codes_are_unique_across_live_rooms() {
        let mut authority = seeded_authority(2);
        let codes: HashSet<String> = (0..256).map(|_| authority.create()).collect();
        assert_eq!(codes.len(), 256);
    }

    #[test]
    fn unknown_code_lookups_and_joins_fail() {
        let mut authority = seeded_authority(3);
        assert!(authority.room("ZZZZZZ").is_none());
        assert_eq!(
            authority.join("ZZZZZZ", Uuid::new_v4(), "Alice").unwrap_err(),
            JoinError::RoomNotFound
        );
    }

    #[test]
    fn six_joins_fill_the_room_with_distinct_colors() {
        let mut authority = seeded_authority(4);
        let code = authority.create();

        let mut colors = HashSet::new();
        for index in 0..6 {
            let outcome = authority
                .join(&code, Uuid::new_v4(), &format!("p{index}"))
                .unwrap();
            colors.insert(outcome.player.color.clone());
        }
        assert_eq!(colors.len(), 6);

        let seventh = authority.join(&code, Uuid::new_v4(), "late");
        assert_eq!(seventh.unwrap_err(), JoinError::RoomFull);
        assert_eq!(authority.room(&code).unwrap().players.len(), 6);
    }

    #[test]
    fn first_joiner_is_reported_as_host() {
        let mut authority = seeded_authority(5);
        let code = authority.create();

        let first = authority.join(&code, Uuid::new_v4(), "Alice").unwrap();
        assert!(first.is_host);
        assert_eq!(first.room.host_id, Some(first.player.id));

        let second = authority.join(&code, Uuid::new_v4(), "Bob").unwrap();
        assert!(!second.is_host);
    }

    #[test]
    fn start_game_requires_the_host_and_a_quorum() {
        let mut authority = seeded_authority(6);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        authority.join(&code, alice, "Alice").unwrap();
        assert!(authority.start_game(&code, alice).is_none());

        authority.join(&code, bob, "Bob").unwrap();
        assert!(authority.start_game(&code, bob).is_none());

        let snapshot = authority.start_game(&code, alice).unwrap();
        assert!(snapshot.game_started);
    }

    #[test]
    fn record_move_reports_the_landing_and_mirrors_the_card() {
        let mut authority = seeded_authority(7);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();
        authority.join(&code, bob, "Bob").unwrap();
        authority.start_game(&code, alice).unwrap();

        match authority.record_move(&code, alice).unwrap() {
            MoveOutcome::Moved {
                player_id,
                die,
                position,
                next_player_id,
                card,
            } => {
                assert_eq!(player_id, alice);
                assert!((1..=6).contains(&die));
                assert_eq!(position, u32::from(die));
                assert_eq!(next_player_id, bob);
                assert_eq!(card.is_some(), board::island_color(position).draws_card());
                assert_eq!(authority.room(&code).unwrap().current_card, card);
            }
            other => panic!("expected an ordinary move, got {other:?}"),
        }
    }

    #[test]
    fn out_of_turn_move_is_ignored() {
        let mut authority = seeded_authority(8);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();
        authority.join(&code, bob, "Bob").unwrap();
        authority.start_game(&code, alice).unwrap();

        let before = authority.room(&code).unwrap().clone();
        assert!(authority.record_move(&code, bob).is_none());
        assert_eq!(authority.room(&code).unwrap(), &before);
    }

    #[test]
    fn move_onto_the_track_end_wins() {
        let mut authority = seeded_authority(9);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();
        authority.join(&code, bob, "Bob").unwrap();
        authority.start_game(&code, alice).unwrap();
        authority.rooms.get_mut(&code).unwrap().players[0].position = 31;

        match authority.record_move(&code, alice).unwrap() {
            MoveOutcome::Won { winner } => {
                assert_eq!(winner.id, alice);
                assert_eq!(winner.position, board::TRACK_LENGTH);
            }
            other => panic!("expected a win, got {other:?}"),
        }
        assert!(authority.room(&code).unwrap().has_won);
    }

    #[test]
    fn acknowledge_card_clears_the_pending_prompt() {
        let mut authority = seeded_authority(10);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();
        authority.join(&code, bob, "Bob").unwrap();
        authority.start_game(&code, alice).unwrap();
        authority.record_move(&code, alice).unwrap();

        assert!(authority.acknowledge_card(&code));
        assert_eq!(authority.room(&code).unwrap().current_card, None);
        assert!(!authority.acknowledge_card("ZZZZZZ"));
    }

    #[test]
    fn disconnecting_the_host_passes_the_seat_on() {
        let mut authority = seeded_authority(11);
        let code = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();
        authority.join(&code, bob, "Bob").unwrap();

        let departures = authority.disconnect(alice);
        assert_eq!(departures.len(), 1);
        match &departures[0] {
            RoomDeparture::Remaining {
                code: departed_code,
                players,
                left_player_id,
                new_host_id,
            } => {
                assert_eq!(departed_code, &code);
                assert_eq!(players.len(), 1);
                assert_eq!(*left_player_id, alice);
                assert_eq!(*new_host_id, Some(bob));
            }
            other => panic!("expected a remaining roster, got {other:?}"),
        }
        assert_eq!(authority.room(&code).unwrap().host_id, Some(bob));
    }

    #[test]
    fn disconnecting_the_last_player_removes_the_room() {
        let mut authority = seeded_authority(12);
        let code = authority.create();
        let alice = Uuid::new_v4();
        authority.join(&code, alice, "Alice").unwrap();

        let departures = authority.disconnect(alice);
        assert_eq!(departures, vec![RoomDeparture::Emptied { code: code.clone() }]);
        assert!(authority.room(&code).is_none());
        assert_eq!(authority.room_count(), 0);
    }

    #[test]
    fn disconnect_sweeps_every_room_seating_the_connection() {
        let mut authority = seeded_authority(13);
        let first = authority.create();
        let second = authority.create();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        authority.join(&first, alice, "Alice").unwrap();
        authority.join(&second, alice, "Alice").unwrap();
        authority.join(&second, bob, "Bob").unwrap();

        let departures = authority.disconnect(alice);
        assert_eq!(departures.len(), 2);
        assert!(authority.room(&first).is_none());
        assert_eq!(authority.room(&second).unwrap().players.len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut authority = seeded_authority(14);
        let code = authority.create();
        authority.remove(&code);
        authority.remove(&code);
        assert!(authority.room(&code).is_none());
    }
}
