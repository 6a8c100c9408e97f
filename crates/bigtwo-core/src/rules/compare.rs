use crate::model::category::Category;
use crate::model::played::PlayedHand;
use std::cmp::Ordering;

/// Decides whether `candidate` legally beats the hand standing on the table.
///
/// With nothing on the table any valid hand may open. Bombs (Four-plus-one,
/// Straight Flush) override normal ordering; otherwise card counts must
/// match and only the non-bomb five-card categories may beat each other
/// across category lines. Never panics; an invalid candidate always loses.
pub fn beats(candidate: &PlayedHand, on_table: Option<&PlayedHand>) -> bool {
    if candidate.category() == Category::Invalid {
        return false;
    }
    let Some(table) = on_table else {
        return true;
    };

    match (candidate.is_bomb(), table.is_bomb()) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => bomb_beats(candidate, table),
        (false, false) => standard_beats(candidate, table),
    }
}

fn bomb_beats(candidate: &PlayedHand, table: &PlayedHand) -> bool {
    match (candidate.category(), table.category()) {
        (Category::StraightFlush, Category::FourPlusOne) => true,
        (Category::FourPlusOne, Category::StraightFlush) => false,
        _ => same_category_beats(candidate, table),
    }
}

fn standard_beats(candidate: &PlayedHand, table: &PlayedHand) -> bool {
    if candidate.len() != table.len() {
        return false;
    }
    if candidate.category() != table.category() {
        // Equal counts with different categories only happens among
        // Straight < Flush < Full House.
        return candidate.len() == 5 && candidate.category() > table.category();
    }
    same_category_beats(candidate, table)
}

fn same_category_beats(candidate: &PlayedHand, table: &PlayedHand) -> bool {
    match candidate.effective_rank().cmp(&table.effective_rank()) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => {
            if !candidate.category().suit_breaks_ties() {
                return false;
            }
            match (candidate.effective_suit(), table.effective_suit()) {
                (Some(ours), Some(theirs)) => ours > theirs,
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::beats;
    use crate::model::card::Card;
    use crate::model::played::PlayedHand;
    use crate::model::rank::Rank::{self, *};
    use crate::model::suit::Suit::{self, *};
    use crate::rules::classify;

    fn hand(cards: &[(Rank, Suit)]) -> PlayedHand {
        let cards: Vec<Card> = cards.iter().map(|&(r, s)| Card::new(r, s)).collect();
        classify(&cards).expect("test hand classifies")
    }

    fn straight_to(top: Rank, top_suit: Suit) -> PlayedHand {
        let start = top.value() - 4;
        let mut cards = Vec::new();
        for value in start..top.value() {
            let suit = if value % 2 == 0 { Clubs } else { Hearts };
            cards.push((Rank::from_value(value).unwrap(), suit));
        }
        cards.push((top, top_suit));
        hand(&cards)
    }

    fn quad(rank: Rank, kicker: Rank) -> PlayedHand {
        hand(&[
            (rank, Diamonds),
            (rank, Clubs),
            (rank, Hearts),
            (rank, Spades),
            (kicker, Diamonds),
        ])
    }

    fn straight_flush(top: Rank, suit: Suit) -> PlayedHand {
        let start = top.value() - 4;
        let cards: Vec<_> = (start..=top.value())
            .map(|v| (Rank::from_value(v).unwrap(), suit))
            .collect();
        hand(&cards)
    }

    #[test]
    fn anything_valid_opens_an_empty_table() {
        assert!(beats(&hand(&[(Three, Diamonds)]), None));
        assert!(beats(&quad(Five, Nine), None));
        assert!(!beats(&PlayedHand::invalid(vec![Card::OPENING]), None));
    }

    #[test]
    fn higher_single_wins_and_suit_breaks_ties() {
        let ace_clubs = hand(&[(Ace, Clubs)]);
        let ace_spades = hand(&[(Ace, Spades)]);
        let two_diamonds = hand(&[(Two, Diamonds)]);
        assert!(beats(&ace_spades, Some(&ace_clubs)));
        assert!(!beats(&ace_clubs, Some(&ace_spades)));
        assert!(beats(&two_diamonds, Some(&ace_spades)));
    }

    #[test]
    fn pair_compares_highest_suit() {
        let low = hand(&[(Eight, Diamonds), (Eight, Hearts)]);
        let high = hand(&[(Eight, Clubs), (Eight, Spades)]);
        assert!(beats(&high, Some(&low)));
        assert!(!beats(&low, Some(&high)));
    }

    #[test]
    fn card_counts_must_match() {
        let single = hand(&[(Two, Spades)]);
        let pair = hand(&[(Three, Diamonds), (Three, Clubs)]);
        assert!(!beats(&pair, Some(&single)));
        assert!(!beats(&single, Some(&pair)));
    }

    #[test]
    fn five_card_category_ladder() {
        let straight = straight_to(Two, Spades);
        let flush = hand(&[
            (Three, Clubs),
            (Five, Clubs),
            (Seven, Clubs),
            (Nine, Clubs),
            (Jack, Clubs),
        ]);
        let full_house = hand(&[
            (Three, Diamonds),
            (Three, Clubs),
            (Three, Hearts),
            (Four, Clubs),
            (Four, Hearts),
        ]);
        assert!(beats(&flush, Some(&straight)));
        assert!(beats(&full_house, Some(&flush)));
        assert!(!beats(&straight, Some(&flush)));
        assert!(!beats(&flush, Some(&full_house)));
    }

    #[test]
    fn straight_tie_breaks_on_top_suit() {
        let hearts_top = straight_to(Nine, Hearts);
        let spades_top = straight_to(Nine, Spades);
        assert!(beats(&spades_top, Some(&hearts_top)));
        assert!(!beats(&hearts_top, Some(&spades_top)));
    }

    #[test]
    fn triples_never_tie_break() {
        let a = hand(&[(Ten, Diamonds), (Ten, Clubs), (Ten, Spades)]);
        let b = hand(&[(Ten, Diamonds), (Ten, Hearts), (Ten, Spades)]);
        assert!(!beats(&a, Some(&b)));
        assert!(!beats(&b, Some(&a)));
    }

    #[test]
    fn bombs_dominate_everything_else() {
        let bomb = quad(Three, Four);
        let pair = hand(&[(Two, Diamonds), (Two, Spades)]);
        let full_house = hand(&[
            (Ace, Diamonds),
            (Ace, Clubs),
            (Ace, Hearts),
            (King, Clubs),
            (King, Hearts),
        ]);
        assert!(beats(&bomb, Some(&pair)));
        assert!(beats(&bomb, Some(&full_house)));
        assert!(!beats(&full_house, Some(&bomb)));
        assert!(!beats(&pair, Some(&bomb)));
    }

    #[test]
    fn straight_flush_outranks_any_quad() {
        let low_sf = straight_flush(Seven, Diamonds);
        let high_quad = quad(Two, Three);
        assert!(beats(&low_sf, Some(&high_quad)));
        assert!(!beats(&high_quad, Some(&low_sf)));
    }

    #[test]
    fn bombs_of_one_kind_compare_rank_then_suit() {
        assert!(beats(&quad(Nine, Three), Some(&quad(Eight, Three))));
        assert!(!beats(&quad(Eight, Three), Some(&quad(Nine, Three))));

        let hearts = straight_flush(Ten, Hearts);
        let spades = straight_flush(Ten, Spades);
        assert!(beats(&spades, Some(&hearts)));
        assert!(!beats(&hearts, Some(&spades)));
        assert!(beats(&straight_flush(Jack, Diamonds), Some(&spades)));
    }

    #[test]
    fn invalid_candidate_never_beats() {
        let table = hand(&[(Three, Diamonds)]);
        let invalid = PlayedHand::invalid(vec![Card::new(Two, Spades)]);
        assert!(!beats(&invalid, Some(&table)));
    }
}
