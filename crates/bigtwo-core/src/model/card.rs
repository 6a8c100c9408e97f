use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A single playing card. Field order drives the derived ordering:
/// rank first, suit as the tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// The conventional opening card; its holder leads the first trick.
    pub const OPENING: Card = Card::new(Rank::Three, Suit::Diamonds);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn is_opening(self) -> bool {
        self == Self::OPENING
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Formats a run of cards as `[3D, 4C]` for log lines and error text.
pub fn display_cards(cards: &[Card]) -> String {
    let parts: Vec<String> = cards.iter().map(Card::to_string).collect();
    format!("[{}]", parts.join(", "))
}
