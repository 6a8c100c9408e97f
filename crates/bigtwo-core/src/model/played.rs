use crate::model::card::{Card, display_cards};
use crate::model::category::Category;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::Serialize;

/// A classified group of cards as played to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayedHand {
    cards: Vec<Card>,
    category: Category,
    effective_rank: Rank,
    effective_suit: Option<Suit>,
}

impl PlayedHand {
    pub(crate) fn new(
        mut cards: Vec<Card>,
        category: Category,
        effective_rank: Rank,
        effective_suit: Option<Suit>,
    ) -> Self {
        cards.sort();
        Self {
            cards,
            category,
            effective_rank,
            effective_suit,
        }
    }

    /// A hand tagged with the invalid sentinel. It never beats anything.
    pub fn invalid(cards: Vec<Card>) -> Self {
        let rank = cards.iter().map(|c| c.rank).max().unwrap_or(Rank::Three);
        Self::new(cards, Category::Invalid, rank, None)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn effective_rank(&self) -> Rank {
        self.effective_rank
    }

    /// `None` for categories compared on rank alone (Triple, Full House, Four-plus-one).
    pub fn effective_suit(&self) -> Option<Suit> {
        self.effective_suit
    }

    pub fn is_bomb(&self) -> bool {
        self.category.is_bomb()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl fmt::Display for PlayedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, display_cards(&self.cards))
    }
}
