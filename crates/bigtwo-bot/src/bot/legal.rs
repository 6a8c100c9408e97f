use bigtwo_core::model::card::Card;
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::played::PlayedHand;
use bigtwo_core::rules::{beats, classify};

const PLAYABLE_SIZES: [usize; 4] = [1, 2, 3, 5];

/// Every distinct classifiable group of cards from `hand` that may be played
/// onto `standing`, smallest groups first.
pub fn legal_plays(hand: &Hand, standing: Option<&PlayedHand>) -> Vec<PlayedHand> {
    let cards = hand.cards();
    let mut plays = Vec::new();
    for size in PLAYABLE_SIZES {
        if !size_can_answer(size, standing) || size > cards.len() {
            continue;
        }
        for_each_combination(cards, size, |group| {
            if let Ok(played) = classify(group) {
                if beats(&played, standing) {
                    plays.push(played);
                }
            }
        });
    }
    plays
}

/// Only matching counts compete, except that five-card bombs answer anything.
fn size_can_answer(size: usize, standing: Option<&PlayedHand>) -> bool {
    match standing {
        None => true,
        Some(hand) => size == hand.len() || size == 5,
    }
}

fn for_each_combination(cards: &[Card], size: usize, mut visit: impl FnMut(&[Card])) {
    let mut indices: Vec<usize> = (0..size).collect();
    let mut group = Vec::with_capacity(size);
    let n = cards.len();
    loop {
        group.clear();
        group.extend(indices.iter().map(|&i| cards[i]));
        visit(&group);

        // Advance the rightmost index that still has room.
        let Some(pos) = (0..size).rev().find(|&i| indices[i] != i + n - size) else {
            return;
        };
        indices[pos] += 1;
        for next in pos + 1..size {
            indices[next] = indices[next - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{for_each_combination, legal_plays};
    use bigtwo_core::model::card::Card;
    use bigtwo_core::model::category::Category;
    use bigtwo_core::model::hand::Hand;
    use bigtwo_core::model::rank::Rank::{self, *};
    use bigtwo_core::model::suit::Suit::{self, *};
    use bigtwo_core::rules::classify;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    #[test]
    fn combinations_are_counted_exactly() {
        let cards: Vec<Card> = [Three, Four, Five, Six, Seven, Eight]
            .into_iter()
            .map(|r| c(r, Clubs))
            .collect();
        let mut count = 0;
        for_each_combination(&cards, 3, |_| count += 1);
        assert_eq!(count, 20);
        let mut all = 0;
        for_each_combination(&cards, 6, |_| all += 1);
        assert_eq!(all, 1);
    }

    #[test]
    fn leading_offers_every_shape() {
        let hand = Hand::with_cards(vec![
            c(Three, Diamonds),
            c(Three, Clubs),
            c(Three, Hearts),
            c(Nine, Spades),
        ]);
        let plays = legal_plays(&hand, None);
        let count = |cat: Category| plays.iter().filter(|p| p.category() == cat).count();
        assert_eq!(count(Category::Single), 4);
        assert_eq!(count(Category::Pair), 3);
        assert_eq!(count(Category::Triple), 1);
        assert_eq!(plays.len(), 8);
    }

    #[test]
    fn following_requires_matching_shape_or_bomb() {
        let hand = Hand::with_cards(vec![
            c(Four, Diamonds),
            c(Four, Clubs),
            c(Four, Hearts),
            c(Four, Spades),
            c(Ace, Spades),
            c(Two, Hearts),
        ]);
        let pair_of_kings = classify(&[c(King, Clubs), c(King, Spades)]).unwrap();
        let plays = legal_plays(&hand, Some(&pair_of_kings));
        assert!(plays.iter().all(|p| p.len() == 5 || p.len() == 2));
        assert!(plays.iter().all(|p| p.category() != Category::Pair));
        // Four fours with either kicker.
        assert_eq!(plays.len(), 2);
        assert!(plays.iter().all(|p| p.is_bomb()));
    }

    #[test]
    fn nothing_beats_the_top_single() {
        let hand = Hand::with_cards(vec![c(Three, Diamonds), c(Ace, Spades)]);
        let two_spades = classify(&[c(Two, Spades)]).unwrap();
        assert!(legal_plays(&hand, Some(&two_spades)).is_empty());
    }
}
