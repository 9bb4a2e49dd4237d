//! Prompt card catalog, grouped by tile color.

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::board::IslandColor;

/// One prompt from the catalog.
///
/// Quiz cards carry a question with options and an advisory correct answer
/// (honesty is left to the table, the server never checks it); task cards
/// carry a physical or creative challenge; some cards combine both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Card {
    /// Catalog identifier, unique within the catalog.
    pub id: String,
    /// Tile color this card is drawn for.
    #[serde(rename = "type")]
    pub color: IslandColor,
    /// Quiz question, when the card has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Multiple-choice options for the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Advisory correct answer for quiz cards.
    #[serde(rename = "correctAnswer", skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Challenge to act out, when the card has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
}

/// Read-only table of prompts keyed by the tile color that draws them.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: IndexMap<IslandColor, Vec<Card>>,
}

impl CardCatalog {
    /// Build a catalog from prompt sets keyed by color.
    pub fn new(cards: IndexMap<IslandColor, Vec<Card>>) -> Self {
        Self { cards }
    }

    /// Draw a uniformly random prompt for a tile color.
    ///
    /// White tiles and colors without prompts yield nothing. Draws never
    /// deplete the catalog, so repeats across turns are expected.
    pub fn draw<R: Rng + ?Sized>(&self, color: IslandColor, rng: &mut R) -> Option<Card> {
        if !color.draws_card() {
            return None;
        }
        self.cards
            .get(&color)
            .and_then(|set| set.choose(rng))
            .cloned()
    }

    /// Number of prompts available for `color`.
    pub fn prompts_for(&self, color: IslandColor) -> usize {
        self.cards.get(&color).map_or(0, Vec::len)
    }

    /// Total number of prompts across all colors.
    pub fn len(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    /// Whether the catalog holds no prompts at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
