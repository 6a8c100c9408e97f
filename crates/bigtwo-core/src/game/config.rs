use crate::model::deck::STANDARD_DECK_SIZE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PLAYERS: usize = 4;
const DEFAULT_TARGET_SCORE: u32 = 100;
const MIN_PLAYERS: usize = 2;

/// Match setup. Missing fields fall back to a four-player match to 100 points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_players")]
    pub players: usize,
    #[serde(default = "default_target_score")]
    pub target_score: u32,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            target_score: DEFAULT_TARGET_SCORE,
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.players < MIN_PLAYERS {
            return Err(ConfigError::TooFewPlayers {
                players: self.players,
                min: MIN_PLAYERS,
            });
        }
        if self.cards_per_player() == 0 {
            return Err(ConfigError::NotEnoughCards {
                players: self.players,
                deck: STANDARD_DECK_SIZE,
            });
        }
        if self.target_score == 0 {
            return Err(ConfigError::ZeroTarget);
        }
        Ok(())
    }

    /// Even share of the deck; any remainder stays undealt.
    pub fn cards_per_player(&self) -> usize {
        STANDARD_DECK_SIZE.checked_div(self.players).unwrap_or(0)
    }
}

fn default_players() -> usize {
    DEFAULT_PLAYERS
}

fn default_target_score() -> u32 {
    DEFAULT_TARGET_SCORE
}

/// Fatal setup problems; a match cannot start with any of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no players configured")]
    NoPlayers,
    #[error("{players} player(s) configured but at least {min} are required")]
    TooFewPlayers { players: usize, min: usize },
    #[error("not enough cards to deal a {deck}-card deck evenly to {players} players")]
    NotEnoughCards { players: usize, deck: usize },
    #[error("target score must be greater than zero")]
    ZeroTarget,
    #[error("preset deal rejected: {reason}")]
    InvalidPreset { reason: String },
}
