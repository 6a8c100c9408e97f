use super::{Decision, Policy, PolicyContext};
use crate::bot::{BotStyle, DANGER_CARDS, legal_plays};
use bigtwo_core::model::card::display_cards;
use bigtwo_core::model::category::Category;
use bigtwo_core::model::played::PlayedHand;
use bigtwo_core::model::rank::Rank;
use bigtwo_core::model::suit::Suit;
use tracing::{Level, event};

/// Rule-of-thumb player: never passes a lead, sheds weak cards first, and
/// keeps bombs back according to its [`BotStyle`].
pub struct HeuristicPolicy {
    style: BotStyle,
}

impl HeuristicPolicy {
    pub fn new(style: BotStyle) -> Self {
        Self { style }
    }

    pub fn cautious() -> Self {
        Self::new(BotStyle::Cautious)
    }

    pub fn aggressive() -> Self {
        Self::new(BotStyle::Aggressive)
    }

    pub fn style(&self) -> BotStyle {
        self.style
    }
}

impl Policy for HeuristicPolicy {
    fn choose(&mut self, ctx: &PolicyContext) -> Decision {
        let legal = legal_plays(ctx.hand, ctx.standing);

        if let Some(finisher) = legal.iter().find(|p| p.len() == ctx.hand.len()) {
            return decide(ctx, self.style, legal.len(), Some(finisher), "go_out");
        }

        let (regular, bombs): (Vec<&PlayedHand>, Vec<&PlayedHand>) =
            legal.iter().partition(|p| !p.is_bomb());
        let danger = ctx.fewest_opponent_cards <= DANGER_CARDS || ctx.near_target();

        let (chosen, reason) = if ctx.is_leading() {
            match self.style {
                BotStyle::Cautious => (weakest(&regular).or_else(|| weakest(&bombs)), "lead_weakest"),
                BotStyle::Aggressive => (
                    largest(&regular).or_else(|| weakest(&bombs)),
                    "lead_largest",
                ),
            }
        } else if let Some(play) = weakest(&regular) {
            (Some(play), "follow_weakest")
        } else if danger || self.style == BotStyle::Aggressive {
            (weakest(&bombs), "bomb")
        } else {
            (None, "hold_bombs")
        };

        decide(ctx, self.style, legal.len(), chosen, reason)
    }
}

fn strength(play: &PlayedHand) -> (Category, Rank, Option<Suit>) {
    (play.category(), play.effective_rank(), play.effective_suit())
}

fn weakest<'a>(plays: &[&'a PlayedHand]) -> Option<&'a PlayedHand> {
    plays.iter().copied().min_by_key(|p| strength(p))
}

/// Most cards shed at once; among equals, the weakest.
fn largest<'a>(plays: &[&'a PlayedHand]) -> Option<&'a PlayedHand> {
    plays
        .iter()
        .copied()
        .min_by_key(|p| (std::cmp::Reverse(p.len()), strength(p)))
}

fn decide(
    ctx: &PolicyContext,
    style: BotStyle,
    legal_count: usize,
    chosen: Option<&PlayedHand>,
    reason: &str,
) -> Decision {
    let decision = match chosen {
        Some(play) => Decision::Play(play.cards().to_vec()),
        // A leader always holds at least one legal single.
        None if ctx.is_leading() => match ctx.hand.lowest() {
            Some(card) => Decision::Play(vec![card]),
            None => Decision::Pass,
        },
        None => Decision::Pass,
    };

    if tracing::enabled!(Level::DEBUG) {
        let summary = match &decision {
            Decision::Play(cards) => display_cards(cards),
            Decision::Pass => "pass".to_string(),
        };
        event!(
            target: "bigtwo_bot::decision",
            Level::DEBUG,
            seat = ctx.seat,
            style = %style,
            legal = legal_count,
            hand = ctx.hand.len(),
            fewest_opponent_cards = ctx.fewest_opponent_cards,
            score = ctx.scores.score(ctx.seat),
            decision = %summary,
            reason,
        );
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::HeuristicPolicy;
    use crate::policy::{Decision, Policy, PolicyContext};
    use bigtwo_core::model::card::Card;
    use bigtwo_core::model::hand::Hand;
    use bigtwo_core::model::played::PlayedHand;
    use bigtwo_core::model::rank::Rank::{self, *};
    use bigtwo_core::model::score::ScoreBoard;
    use bigtwo_core::model::suit::Suit::{self, *};
    use bigtwo_core::rules::classify;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn ctx<'a>(
        hand: &'a Hand,
        standing: Option<&'a PlayedHand>,
        fewest: usize,
        scores: &'a ScoreBoard,
    ) -> PolicyContext<'a> {
        PolicyContext {
            seat: 0,
            hand,
            standing,
            fewest_opponent_cards: fewest,
            scores,
            target_score: 100,
        }
    }

    fn bomb_hand() -> Hand {
        Hand::with_cards(vec![
            c(Three, Diamonds),
            c(Seven, Diamonds),
            c(Seven, Clubs),
            c(Seven, Hearts),
            c(Seven, Spades),
            c(Nine, Clubs),
        ])
    }

    #[test]
    fn cautious_leads_lowest_single() {
        let hand = Hand::with_cards(vec![c(Nine, Clubs), c(Three, Hearts), c(Three, Spades)]);
        let scores = ScoreBoard::new(4);
        let decision = HeuristicPolicy::cautious().choose(&ctx(&hand, None, 13, &scores));
        assert_eq!(decision, Decision::Play(vec![c(Three, Hearts)]));
    }

    #[test]
    fn aggressive_leads_largest_combination() {
        let hand = Hand::with_cards(vec![
            c(Three, Hearts),
            c(Five, Clubs),
            c(Five, Spades),
            c(Nine, Clubs),
        ]);
        let scores = ScoreBoard::new(4);
        let decision = HeuristicPolicy::aggressive().choose(&ctx(&hand, None, 13, &scores));
        assert_eq!(decision, Decision::Play(vec![c(Five, Clubs), c(Five, Spades)]));
    }

    #[test]
    fn follows_with_weakest_beating_hand() {
        let hand = Hand::with_cards(vec![c(Four, Clubs), c(Ten, Hearts), c(King, Spades)]);
        let standing = classify(&[c(Eight, Diamonds)]).unwrap();
        let scores = ScoreBoard::new(4);
        let decision =
            HeuristicPolicy::cautious().choose(&ctx(&hand, Some(&standing), 13, &scores));
        assert_eq!(decision, Decision::Play(vec![c(Ten, Hearts)]));
    }

    #[test]
    fn cautious_holds_bombs_until_danger() {
        let hand = bomb_hand();
        let standing = classify(&[c(Two, Spades)]).unwrap();
        let scores = ScoreBoard::new(4);
        let mut policy = HeuristicPolicy::cautious();
        assert_eq!(
            policy.choose(&ctx(&hand, Some(&standing), 10, &scores)),
            Decision::Pass
        );
        let Decision::Play(cards) = policy.choose(&ctx(&hand, Some(&standing), 2, &scores)) else {
            panic!("expected a bomb");
        };
        assert!(classify(&cards).unwrap().is_bomb());
    }

    #[test]
    fn cautious_bombs_when_close_to_the_target() {
        let hand = bomb_hand();
        let standing = classify(&[c(Two, Spades)]).unwrap();
        let mut scores = ScoreBoard::new(4);
        scores.add_penalty(0, 74);
        let mut policy = HeuristicPolicy::cautious();
        assert_eq!(
            policy.choose(&ctx(&hand, Some(&standing), 10, &scores)),
            Decision::Pass
        );

        scores.add_penalty(0, 1);
        let context = ctx(&hand, Some(&standing), 10, &scores);
        assert!(context.near_target());
        let Decision::Play(cards) = policy.choose(&context) else {
            panic!("expected a bomb at 75 of 100");
        };
        assert!(classify(&cards).unwrap().is_bomb());
    }

    #[test]
    fn aggressive_bombs_when_it_cannot_follow() {
        let hand = bomb_hand();
        let standing = classify(&[c(Two, Spades)]).unwrap();
        let scores = ScoreBoard::new(4);
        let Decision::Play(cards) =
            HeuristicPolicy::aggressive().choose(&ctx(&hand, Some(&standing), 10, &scores))
        else {
            panic!("expected a bomb");
        };
        assert_eq!(cards.len(), 5);
        // Weakest kicker goes with the quads.
        assert!(cards.contains(&c(Three, Diamonds)));
    }

    #[test]
    fn goes_out_when_possible() {
        let hand = Hand::with_cards(vec![c(Six, Clubs), c(Six, Hearts)]);
        let standing = classify(&[c(Five, Diamonds), c(Five, Spades)]).unwrap();
        let scores = ScoreBoard::new(4);
        let decision =
            HeuristicPolicy::cautious().choose(&ctx(&hand, Some(&standing), 13, &scores));
        assert_eq!(decision, Decision::Play(vec![c(Six, Clubs), c(Six, Hearts)]));
    }

    #[test]
    fn passes_when_nothing_beats() {
        let hand = Hand::with_cards(vec![c(Four, Clubs), c(Five, Hearts)]);
        let standing = classify(&[c(Two, Spades)]).unwrap();
        let scores = ScoreBoard::new(4);
        let decision =
            HeuristicPolicy::aggressive().choose(&ctx(&hand, Some(&standing), 1, &scores));
        assert_eq!(decision, Decision::Pass);
    }
}
