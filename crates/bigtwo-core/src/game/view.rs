use super::match_state::{MatchState, RoundRecord};
use crate::model::card::Card;
use crate::model::category::Category;
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::Serialize;
use std::collections::BTreeMap;

/// What one seat (or an observer) is allowed to see of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub your_player_id: Option<PlayerId>,
    pub hand: Vec<Card>,
    pub players: Vec<SeatView>,
    pub last_played_hand: Option<LastPlayView>,
    pub current_player_id: PlayerId,
    pub current_player_name: String,
    pub pass_count: usize,
    pub round_number: u32,
    pub target_score: u32,
    pub is_game_over: bool,
    pub winner_id: Option<PlayerId>,
    pub is_match_over: bool,
    pub overall_winner_id: Option<PlayerId>,
    pub scores: BTreeMap<PlayerId, u32>,
    pub round_scores_history: Vec<RoundView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    pub id: PlayerId,
    pub name: String,
    pub card_count: usize,
    pub has_passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastPlayView {
    pub player_id: PlayerId,
    pub player_name: String,
    pub cards: Vec<Card>,
    pub category: Category,
    pub label: &'static str,
    pub effective_rank: Rank,
    pub effective_suit: Option<Suit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub round_number: u32,
    pub winner_id: PlayerId,
    pub penalties: BTreeMap<PlayerId, u32>,
}

impl MatchView {
    /// Renders the match for `seat`. `None` (or an unknown seat) sees no hand.
    pub fn capture(state: &MatchState, seat: Option<usize>) -> Self {
        let viewer = seat.and_then(|s| state.player(s));
        let players = state.players();
        let id_of = |seat: usize| players[seat].id().clone();
        let current = state.current_player();

        MatchView {
            your_player_id: viewer.map(|p| p.id().clone()),
            hand: viewer.map(|p| p.hand().cards().to_vec()).unwrap_or_default(),
            players: players
                .iter()
                .map(|p| SeatView {
                    id: p.id().clone(),
                    name: p.name().to_string(),
                    card_count: p.card_count(),
                    has_passed: p.has_passed(),
                })
                .collect(),
            last_played_hand: state.standing().map(|standing| LastPlayView {
                player_id: id_of(standing.seat),
                player_name: players[standing.seat].name().to_string(),
                cards: standing.hand.cards().to_vec(),
                category: standing.hand.category(),
                label: standing.hand.category().label(),
                effective_rank: standing.hand.effective_rank(),
                effective_suit: standing.hand.effective_suit(),
            }),
            current_player_id: current.id().clone(),
            current_player_name: current.name().to_string(),
            pass_count: state.pass_count(),
            round_number: state.round_number(),
            target_score: state.config().target_score,
            is_game_over: state.is_round_over(),
            winner_id: state.round_winner().map(id_of),
            is_match_over: state.is_match_over(),
            overall_winner_id: state.match_winner().map(id_of),
            scores: players
                .iter()
                .enumerate()
                .map(|(seat, p)| (p.id().clone(), state.scores().score(seat)))
                .collect(),
            round_scores_history: state
                .history()
                .iter()
                .map(|record| RoundView::from_record(record, &id_of))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl RoundView {
    fn from_record(record: &RoundRecord, id_of: &impl Fn(usize) -> PlayerId) -> Self {
        RoundView {
            round_number: record.round_number,
            winner_id: id_of(record.winner),
            penalties: record.penalties.clone(),
        }
    }
}

impl MatchState {
    pub fn view_for(&self, seat: Option<usize>) -> MatchView {
        MatchView::capture(self, seat)
    }
}
