use crate::model::card::Card;
use crate::model::category::Category;
use crate::model::played::PlayedHand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("no cards selected")]
    Empty,
    #[error("invalid number of cards played: {0}. Must be 1, 2, 3, or 5")]
    WrongCount(usize),
    #[error("not a valid pair (ranks differ)")]
    NotAPair,
    #[error("not a valid triple")]
    NotATriple,
    #[error(
        "selected 5 cards do not form a valid hand (Straight, Flush, Full House, Four of a Kind, or Straight Flush)"
    )]
    NotAFiveCardHand,
}

/// Determines the category and comparison keys of a group of cards.
///
/// The cards are copied and sorted before evaluation, so the caller's
/// ordering never affects the result.
pub fn classify(cards: &[Card]) -> Result<PlayedHand, ClassifyError> {
    let mut sorted = cards.to_vec();
    sorted.sort();

    match sorted.len() {
        0 => Err(ClassifyError::Empty),
        1 => {
            let card = sorted[0];
            Ok(PlayedHand::new(sorted, Category::Single, card.rank, Some(card.suit)))
        }
        2 => {
            if sorted[0].rank != sorted[1].rank {
                return Err(ClassifyError::NotAPair);
            }
            // The higher-suited card sorts last and defines the pair.
            let top = sorted[1];
            Ok(PlayedHand::new(sorted, Category::Pair, top.rank, Some(top.suit)))
        }
        3 => {
            if !sorted.iter().all(|c| c.rank == sorted[0].rank) {
                return Err(ClassifyError::NotATriple);
            }
            let rank = sorted[0].rank;
            Ok(PlayedHand::new(sorted, Category::Triple, rank, None))
        }
        5 => classify_five(sorted),
        other => Err(ClassifyError::WrongCount(other)),
    }
}

fn classify_five(cards: Vec<Card>) -> Result<PlayedHand, ClassifyError> {
    let five: [Card; 5] = match cards.as_slice().try_into() {
        Ok(five) => five,
        Err(_) => return Err(ClassifyError::WrongCount(cards.len())),
    };

    let straight = straight_key(&five);
    let flush = is_flush(&five);

    if let (Some(key), true) = (straight, flush) {
        return Ok(PlayedHand::new(
            cards,
            Category::StraightFlush,
            key.rank,
            Some(key.suit),
        ));
    }
    if let Some(rank) = quad_rank(&five) {
        return Ok(PlayedHand::new(cards, Category::FourPlusOne, rank, None));
    }
    if let Some(rank) = full_house_rank(&five) {
        return Ok(PlayedHand::new(cards, Category::FullHouse, rank, None));
    }
    if flush {
        let top = five[4];
        return Ok(PlayedHand::new(cards, Category::Flush, top.rank, Some(top.suit)));
    }
    if let Some(key) = straight {
        return Ok(PlayedHand::new(cards, Category::Straight, key.rank, Some(key.suit)));
    }
    Err(ClassifyError::NotAFiveCardHand)
}

/// Returns the card that ranks a straight, or `None` if the five sorted cards
/// are not one.
///
/// Recognized runs: any five consecutive ranks in Big Two order (which covers
/// 10-J-Q-K-A and J-Q-K-A-2), plus 3-4-5-A-2, which ranks by its Five.
/// Other wraparounds such as K-A-2-3-4 are not straights.
fn straight_key(cards: &[Card; 5]) -> Option<Card> {
    let ranks = cards.map(|c| c.rank);

    if ranks == [Rank::Three, Rank::Four, Rank::Five, Rank::Ace, Rank::Two] {
        return Some(cards[2]);
    }

    let consecutive = ranks
        .windows(2)
        .all(|pair| pair[0].successor() == Some(pair[1]));
    consecutive.then_some(cards[4])
}

fn is_flush(cards: &[Card; 5]) -> bool {
    let suit: Suit = cards[0].suit;
    cards.iter().all(|c| c.suit == suit)
}

fn quad_rank(cards: &[Card; 5]) -> Option<Rank> {
    let r = cards.map(|c| c.rank);
    if r[0] == r[1] && r[1] == r[2] && r[2] == r[3] {
        Some(r[0])
    } else if r[1] == r[2] && r[2] == r[3] && r[3] == r[4] {
        Some(r[1])
    } else {
        None
    }
}

fn full_house_rank(cards: &[Card; 5]) -> Option<Rank> {
    let r = cards.map(|c| c.rank);
    if r[0] == r[1] && r[1] == r[2] && r[3] == r[4] && r[2] != r[3] {
        Some(r[0])
    } else if r[0] == r[1] && r[2] == r[3] && r[3] == r[4] && r[1] != r[2] {
        Some(r[2])
    } else {
        None
    }
}
