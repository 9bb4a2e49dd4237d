//! Track geometry: tile colors and the winning threshold.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of tiles on the track; reaching this position wins the game.
pub const TRACK_LENGTH: u32 = 32;

/// Tile colors cycling along the track.
///
/// The first four categories draw a prompt card; white tiles are rest stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IslandColor {
    /// Prompt category green.
    Green,
    /// Prompt category orange.
    Orange,
    /// Prompt category pink.
    Pink,
    /// Prompt category yellow.
    Yellow,
    /// Rest tile; no prompt is drawn.
    White,
}

impl IslandColor {
    /// Whether landing on this color draws a prompt card.
    pub fn draws_card(self) -> bool {
        self != Self::White
    }
}

/// Repeating color pattern painted along the track.
const COLOR_CYCLE: [IslandColor; 5] = [
    IslandColor::Green,
    IslandColor::Orange,
    IslandColor::Pink,
    IslandColor::Yellow,
    IslandColor::White,
];

/// Color of the tile at `position`.
pub fn island_color(position: u32) -> IslandColor {
    COLOR_CYCLE[position as usize % COLOR_CYCLE.len()]
}

/// Whether `position` reaches the end of the track.
pub fn is_winning(position: u32) -> bool {
    position >= TRACK_LENGTH
}

/// Position after moving `die` tiles forward.
///
/// Overshoot counts as reaching the end: the result is clamped to
/// [`TRACK_LENGTH`], never wrapped or rejected.
pub fn advance(position: u32, die: u8) -> u32 {
    (position + u32::from(die)).min(TRACK_LENGTH)
}
