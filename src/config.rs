//! Application-level configuration loading, including the marker palette and
//! the built-in prompt catalog.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{info, warn};

use crate::state::board::IslandColor;
use crate::state::catalog::{Card, CardCatalog};

/// Where the server looks for the JSON configuration by default.
const DEFAULT_CONFIG_PATH: &str = "config/game.json";
/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "JOURNEY_BACK_CONFIG_PATH";
/// Fallback marker color handed out when the palette is exhausted.
const DEFAULT_MARKER: &str = "#CCCCCC";

/// Runtime configuration, immutable once loaded and shared across the app.
#[derive(Debug, Clone)]
pub struct AppConfig {
    palette: Vec<String>,
    catalog: CardCatalog,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to the built-in palette
    /// and prompt catalog.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        colors = app_config.palette.len(),
                        prompts = app_config.catalog.len(),
                        "loaded game configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "could not parse config; using built-in defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "no config file; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "could not read config; using built-in defaults"
                );
                Self::default()
            }
        }
    }

    /// Marker color for the player joining at `index` (join order).
    ///
    /// The palette is sized to the room capacity; should a config override
    /// ship fewer entries we hand out [`DEFAULT_MARKER`] rather than refuse
    /// the join.
    pub fn marker_for(&self, index: usize) -> String {
        self.palette
            .get(index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_MARKER.to_string())
    }

    /// Prompt catalog drawn from when a player lands on a colored tile.
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            catalog: CardCatalog::new(default_cards()),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Shape of the configuration file at [`DEFAULT_CONFIG_PATH`]; both sections
/// are optional and default independently.
struct RawConfig {
    palette: Option<Vec<String>>,
    cards: Option<IndexMap<IslandColor, Vec<Card>>>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            palette: value.palette.unwrap_or_else(default_palette),
            catalog: CardCatalog::new(value.cards.unwrap_or_else(default_cards)),
        }
    }
}

/// Configuration path, honoring the environment override when set.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in marker colors, handed out by join order.
fn default_palette() -> Vec<String> {
    [
        "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEEAD", "#D4A5A5",
    ]
    .map(String::from)
    .to_vec()
}

/// Built-in prompt catalog shipped with the binary.
fn default_cards() -> IndexMap<IslandColor, Vec<Card>> {
    let mut cards = IndexMap::new();

    cards.insert(
        IslandColor::Green,
        vec![
            Card {
                id: "g1".into(),
                color: IslandColor::Green,
                question: Some("What is the largest ocean on Earth?".into()),
                options: Some(
                    ["Pacific", "Atlantic", "Indian", "Arctic"]
                        .map(String::from)
                        .to_vec(),
                ),
                correct_answer: Some("Pacific".into()),
                task: None,
            },
            Card {
                id: "g2".into(),
                color: IslandColor::Green,
                question: Some(
                    "Which sea creature can change its color to match its surroundings?".into(),
                ),
                options: Some(
                    ["Octopus", "Shark", "Dolphin", "Whale"]
                        .map(String::from)
                        .to_vec(),
                ),
                correct_answer: Some("Octopus".into()),
                task: None,
            },
        ],
    );

    cards.insert(
        IslandColor::Orange,
        vec![
            Card {
                id: "o1".into(),
                color: IslandColor::Orange,
                question: None,
                options: None,
                correct_answer: None,
                task: Some("Pretend to swim like a fish for 10 seconds!".into()),
            },
            Card {
                id: "o2".into(),
                color: IslandColor::Orange,
                question: None,
                options: None,
                correct_answer: None,
                task: Some("Make your best whale sound!".into()),
            },
        ],
    );

    cards.insert(
        IslandColor::Pink,
        vec![
            Card {
                id: "p1".into(),
                color: IslandColor::Pink,
                question: Some(
                    "Name three types of sea creatures that start with the letter \"S\".".into(),
                ),
                options: None,
                correct_answer: None,
                task: Some("You have 10 seconds!".into()),
            },
            Card {
                id: "p2".into(),
                color: IslandColor::Pink,
                question: Some("What sound does a dolphin make?".into()),
                options: None,
                correct_answer: None,
                task: Some("Show us your best impression!".into()),
            },
        ],
    );

    cards.insert(
        IslandColor::Yellow,
        vec![
            Card {
                id: "y1".into(),
                color: IslandColor::Yellow,
                question: None,
                options: None,
                correct_answer: None,
                task: Some("Skip like a happy sailor for 5 seconds!".into()),
            },
            Card {
                id: "y2".into(),
                color: IslandColor::Yellow,
                question: None,
                options: None,
                correct_answer: None,
                task: Some(
                    "Pretend to row a boat while singing \"Row, Row, Row Your Boat\"!".into(),
                ),
            },
        ],
    );

    cards
}
