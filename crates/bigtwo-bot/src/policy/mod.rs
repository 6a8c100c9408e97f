mod heuristic;

pub use heuristic::HeuristicPolicy;

use bigtwo_core::game::match_state::MatchState;
use bigtwo_core::model::card::Card;
use bigtwo_core::model::hand::Hand;
use bigtwo_core::model::played::PlayedHand;
use bigtwo_core::model::score::ScoreBoard;

/// What a policy may look at when it is `seat`'s turn.
pub struct PolicyContext<'a> {
    pub seat: usize,
    pub hand: &'a Hand,
    pub standing: Option<&'a PlayedHand>,
    /// Fewest cards held by any opponent.
    pub fewest_opponent_cards: usize,
    pub scores: &'a ScoreBoard,
    pub target_score: u32,
}

impl<'a> PolicyContext<'a> {
    pub fn from_state(state: &'a MatchState, seat: usize) -> Option<Self> {
        let player = state.player(seat)?;
        let fewest_opponent_cards = state
            .players()
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != seat)
            .map(|(_, p)| p.card_count())
            .min()
            .unwrap_or(0);
        Some(Self {
            seat,
            hand: player.hand(),
            standing: state.standing().map(|s| &s.hand),
            fewest_opponent_cards,
            scores: state.scores(),
            target_score: state.config().target_score,
        })
    }

    pub fn is_leading(&self) -> bool {
        self.standing.is_none()
    }

    /// Whether this seat's total is within the last quarter of the target.
    pub fn near_target(&self) -> bool {
        let own = u64::from(self.scores.score(self.seat));
        own * 4 >= u64::from(self.target_score) * 3
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Play(Vec<Card>),
    Pass,
}

/// Turn-taking interface for automated players.
pub trait Policy: Send {
    fn choose(&mut self, ctx: &PolicyContext) -> Decision;
}
