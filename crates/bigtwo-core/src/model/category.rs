use core::fmt;
use serde::{Deserialize, Serialize};

/// Hand categories. Declaration order is strength order, which only matters
/// when comparing the non-bomb five-card categories against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Invalid,
    Single,
    Pair,
    Triple,
    Straight,
    Flush,
    FullHouse,
    FourPlusOne,
    StraightFlush,
}

impl Category {
    pub const fn is_bomb(self) -> bool {
        matches!(self, Category::FourPlusOne | Category::StraightFlush)
    }

    /// Whether equal effective ranks fall through to an effective-suit comparison.
    pub const fn suit_breaks_ties(self) -> bool {
        matches!(
            self,
            Category::Single
                | Category::Pair
                | Category::Straight
                | Category::Flush
                | Category::StraightFlush
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Invalid => "Invalid",
            Category::Single => "Single",
            Category::Pair => "Pair",
            Category::Triple => "Triple",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourPlusOne => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::Category;

    #[test]
    fn only_quads_and_straight_flushes_are_bombs() {
        let bombs: Vec<_> = [
            Category::Invalid,
            Category::Single,
            Category::Pair,
            Category::Triple,
            Category::Straight,
            Category::Flush,
            Category::FullHouse,
            Category::FourPlusOne,
            Category::StraightFlush,
        ]
        .into_iter()
        .filter(|c| c.is_bomb())
        .collect();
        assert_eq!(bombs, vec![Category::FourPlusOne, Category::StraightFlush]);
    }

    #[test]
    fn five_card_strength_order() {
        assert!(Category::Straight < Category::Flush);
        assert!(Category::Flush < Category::FullHouse);
    }

    #[test]
    fn triples_and_full_houses_ignore_suit() {
        assert!(!Category::Triple.suit_breaks_ties());
        assert!(!Category::FullHouse.suit_breaks_ties());
        assert!(!Category::FourPlusOne.suit_breaks_ties());
        assert!(Category::Pair.suit_breaks_ties());
    }
}
