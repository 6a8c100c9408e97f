use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

pub const MAX_ALIAS_CHARS: usize = 20;

/// Stable player identifier; game logic compares ids or seat indices, never references.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Id for the player sitting at `seat` (0-based), rendered 1-based.
    pub fn for_seat(seat: usize) -> Self {
        Self(format!("player{}", seat + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Hand,
    passed: bool,
}

impl Player {
    pub fn new(seat: usize) -> Self {
        Self {
            id: PlayerId::for_seat(seat),
            name: format!("P{}", seat + 1),
            hand: Hand::new(),
            passed: false,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies a display name: trimmed, capped at [`MAX_ALIAS_CHARS`]
    /// characters, and falling back to the id when blank.
    pub fn set_alias(&mut self, alias: &str) {
        let trimmed = alias.trim();
        self.name = if trimmed.is_empty() {
            self.id.to_string()
        } else {
            trimmed.chars().take(MAX_ALIAS_CHARS).collect()
        };
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }

    pub fn has_passed(&self) -> bool {
        self.passed
    }

    pub fn set_passed(&mut self, passed: bool) {
        self.passed = passed;
    }

    pub fn card_count(&self) -> usize {
        self.hand.len()
    }
}
