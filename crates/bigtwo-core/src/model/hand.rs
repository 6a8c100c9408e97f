use crate::model::card::{Card, display_cards};
use std::vec::Vec;
use thiserror::Error;

/// A player's holding, kept in canonical (rank, suit) order after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hand is missing {}", display_cards(.0))]
pub struct MissingCards(pub Vec<Card>);

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Multiset containment: every requested card must be matched by a
    /// distinct card in the hand.
    pub fn contains_all(&self, cards: &[Card]) -> bool {
        self.split_off(cards).is_ok()
    }

    /// Removes every card in `cards` or nothing at all.
    pub fn remove_all(&mut self, cards: &[Card]) -> Result<(), MissingCards> {
        let remaining = self.split_off(cards)?;
        self.cards = remaining;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn lowest(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    fn split_off(&self, wanted: &[Card]) -> Result<Vec<Card>, MissingCards> {
        let mut remaining = self.cards.clone();
        let mut missing = Vec::new();
        for card in wanted {
            match remaining.iter().position(|held| held == card) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => missing.push(*card),
            }
        }
        if missing.is_empty() {
            Ok(remaining)
        } else {
            Err(MissingCards(missing))
        }
    }

    fn sort(&mut self) {
        self.cards.sort();
    }
}
