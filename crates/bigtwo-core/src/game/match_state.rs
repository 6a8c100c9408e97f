use crate::game::action::{Action, Outcome};
use crate::game::config::{ConfigError, MatchConfig};
use crate::game::error::ActionError;
use crate::model::card::{Card, display_cards};
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::played::PlayedHand;
use crate::model::player::{Player, PlayerId};
use crate::model::score::{ScoreBoard, score_round};
use crate::rules::{beats, classify};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashSet};
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Playing,
    RoundOver,
    MatchOver,
}

/// The hand currently standing on the table and who played it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingPlay {
    pub seat: usize,
    pub hand: PlayedHand,
}

/// Penalties charged at the end of one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub round_number: u32,
    pub winner: usize,
    pub penalties: BTreeMap<PlayerId, u32>,
}

/// Where every card of the deck currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardCensus {
    pub in_hands: usize,
    pub standing: usize,
    pub discarded: usize,
    pub undealt: usize,
}

impl CardCensus {
    pub fn total(&self) -> usize {
        self.in_hands + self.standing + self.discarded + self.undealt
    }
}

/// One match: the players, the current round, and the running scores.
#[derive(Debug, Clone)]
pub struct MatchState {
    config: MatchConfig,
    players: Vec<Player>,
    turn: usize,
    standing: Option<StandingPlay>,
    discard: Vec<Card>,
    undealt: Deck,
    pass_count: usize,
    round_number: u32,
    phase: MatchPhase,
    round_winner: Option<usize>,
    match_winner: Option<usize>,
    scores: ScoreBoard,
    history: Vec<RoundRecord>,
    rng: StdRng,
    seed: u64,
}

impl MatchState {
    /// Validates the configuration and deals the first round.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let mut state = Self::empty(config)?;
        state.deal_round();
        Ok(state)
    }

    pub fn with_seed(seed: u64) -> Result<Self, ConfigError> {
        Self::new(MatchConfig::with_seed(seed))
    }

    /// Starts a match from prearranged hands, one per seat. Cards nobody
    /// holds stay in the undealt deck. Later rounds are shuffled normally.
    pub fn with_hands(config: MatchConfig, hands: Vec<Vec<Card>>) -> Result<Self, ConfigError> {
        let mut state = Self::empty(config)?;
        if hands.len() != state.players.len() {
            return Err(ConfigError::InvalidPreset {
                reason: format!(
                    "{} hands supplied for {} players",
                    hands.len(),
                    state.players.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        for card in hands.iter().flatten() {
            if !seen.insert(*card) {
                return Err(ConfigError::InvalidPreset {
                    reason: format!("{card} is dealt more than once"),
                });
            }
        }

        let undealt = Deck::standard()
            .cards()
            .iter()
            .copied()
            .filter(|card| !seen.contains(card))
            .collect();
        state.undealt = Deck::from_cards(undealt);
        for (player, cards) in state.players.iter_mut().zip(hands) {
            *player.hand_mut() = Hand::with_cards(cards);
        }
        state.start_round();
        Ok(state)
    }

    fn empty(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let players = (0..config.players).map(Player::new).collect();
        Ok(Self {
            scores: ScoreBoard::new(config.players),
            config,
            players,
            turn: 0,
            standing: None,
            discard: Vec::new(),
            undealt: Deck::default(),
            pass_count: 0,
            round_number: 1,
            phase: MatchPhase::Playing,
            round_winner: None,
            match_winner: None,
            history: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// Applies one action from the player at `seat`. On error nothing changes.
    pub fn apply(&mut self, seat: usize, action: Action) -> Result<Outcome, ActionError> {
        let kind = action.kind();
        let result = match action {
            Action::PlayCards(cards) => self.play(seat, &cards),
            Action::PassTurn => self.pass(seat),
            Action::NewGame => Ok(self.new_game()),
            Action::SetAlias(alias) => self.set_alias(seat, &alias),
        };
        if let Err(err) = &result {
            if err.is_user_error() {
                event!(Level::DEBUG, seat, action = kind, reason = %err, "action rejected");
            }
        }
        result
    }

    pub fn play(&mut self, seat: usize, cards: &[Card]) -> Result<Outcome, ActionError> {
        self.check_seat(seat)?;
        self.ensure_in_progress()?;
        self.ensure_turn(seat)?;

        if !self.players[seat].hand().contains_all(cards) {
            return Err(ActionError::CardsNotHeld);
        }
        let hand = classify(cards)?;
        if !beats(&hand, self.standing.as_ref().map(|s| &s.hand)) {
            return Err(ActionError::DoesNotBeat);
        }

        let player = &mut self.players[seat];
        if let Err(missing) = player.hand_mut().remove_all(hand.cards()) {
            event!(
                Level::ERROR,
                seat,
                player = %player.id(),
                cards = %display_cards(hand.cards()),
                hand = %display_cards(player.hand().cards()),
                %missing,
                "card removal failed after validation"
            );
            return Err(ActionError::InvariantViolation(
                "could not remove cards from hand".to_string(),
            ));
        }
        player.set_passed(false);
        let remaining = player.card_count();

        event!(
            Level::INFO,
            seat,
            player = %self.players[seat].id(),
            played = %hand,
            remaining,
            "cards played"
        );

        if let Some(previous) = self.standing.replace(StandingPlay { seat, hand }) {
            self.discard.extend(previous.hand.into_cards());
        }
        self.pass_count = 0;

        if remaining == 0 {
            let match_over = self.finish_round(seat);
            return Ok(Outcome::RoundWon {
                winner: seat,
                match_over,
            });
        }

        let next_seat = self.advance_turn();
        Ok(Outcome::Played { next_seat })
    }

    pub fn pass(&mut self, seat: usize) -> Result<Outcome, ActionError> {
        self.check_seat(seat)?;
        self.ensure_in_progress()?;
        if seat != self.turn {
            return Err(ActionError::NotYourTurnToPass {
                current: self.current_player().name().to_string(),
            });
        }
        if self.standing.is_none() {
            return Err(ActionError::CannotPassLead);
        }

        self.players[seat].set_passed(true);
        self.pass_count += 1;
        event!(Level::INFO, seat, pass_count = self.pass_count, "player passed");

        let trick_won = self.pass_count >= self.players.len() - 1;
        if trick_won {
            if let Some(previous) = self.standing.take() {
                self.discard.extend(previous.hand.into_cards());
            }
            self.pass_count = 0;
            self.players.iter_mut().for_each(|p| p.set_passed(false));
        }

        let next_seat = self.advance_turn();
        if trick_won {
            event!(Level::INFO, leader = next_seat, "trick won by default; table cleared");
            Ok(Outcome::TrickReset { leader: next_seat })
        } else {
            Ok(Outcome::Passed { next_seat })
        }
    }

    /// Next round if one just ended, otherwise a fresh match. A round still
    /// in progress is abandoned.
    pub fn new_game(&mut self) -> Outcome {
        match self.phase {
            MatchPhase::MatchOver => {
                self.reset_match();
                Outcome::NewMatch {
                    leader: self.turn,
                    abandoned: false,
                }
            }
            MatchPhase::RoundOver => {
                self.round_number += 1;
                self.deal_round();
                event!(Level::INFO, round = self.round_number, leader = self.turn, "next round dealt");
                Outcome::NextRound {
                    round_number: self.round_number,
                    leader: self.turn,
                }
            }
            MatchPhase::Playing => {
                event!(Level::INFO, round = self.round_number, "abandoning live round for a new match");
                self.reset_match();
                Outcome::NewMatch {
                    leader: self.turn,
                    abandoned: true,
                }
            }
        }
    }

    pub fn set_alias(&mut self, seat: usize, alias: &str) -> Result<Outcome, ActionError> {
        self.check_seat(seat)?;
        let player = &mut self.players[seat];
        player.set_alias(alias);
        event!(Level::INFO, seat, name = player.name(), "alias set");
        Ok(Outcome::AliasChanged)
    }

    /// Penalties each player would take if the round were scored now.
    pub fn round_scores(&self) -> BTreeMap<PlayerId, u32> {
        let penalties = score_round(&self.players, self.config.cards_per_player());
        self.players
            .iter()
            .map(|p| p.id().clone())
            .zip(penalties)
            .collect()
    }

    pub fn census(&self) -> CardCensus {
        CardCensus {
            in_hands: self.players.iter().map(Player::card_count).sum(),
            standing: self.standing.as_ref().map_or(0, |s| s.hand.len()),
            discarded: self.discard.len(),
            undealt: self.undealt.len(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id() == id)
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn standing(&self) -> Option<&StandingPlay> {
        self.standing.as_ref()
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn pass_count(&self) -> usize {
        self.pass_count
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_round_over(&self) -> bool {
        !matches!(self.phase, MatchPhase::Playing)
    }

    pub fn is_match_over(&self) -> bool {
        matches!(self.phase, MatchPhase::MatchOver)
    }

    pub fn round_winner(&self) -> Option<usize> {
        self.round_winner
    }

    pub fn match_winner(&self) -> Option<usize> {
        self.match_winner
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn hand_size(&self) -> usize {
        self.config.cards_per_player()
    }

    fn check_seat(&self, seat: usize) -> Result<(), ActionError> {
        if seat < self.players.len() {
            Ok(())
        } else {
            Err(ActionError::UnknownSeat(seat))
        }
    }

    fn ensure_in_progress(&self) -> Result<(), ActionError> {
        match self.phase {
            MatchPhase::Playing => Ok(()),
            MatchPhase::RoundOver => Err(ActionError::RoundOver),
            MatchPhase::MatchOver => Err(ActionError::MatchOver),
        }
    }

    fn ensure_turn(&self, seat: usize) -> Result<(), ActionError> {
        if seat == self.turn {
            Ok(())
        } else {
            Err(ActionError::NotYourTurn {
                current: self.current_player().name().to_string(),
            })
        }
    }

    fn advance_turn(&mut self) -> usize {
        self.turn = (self.turn + 1) % self.players.len();
        self.players[self.turn].set_passed(false);
        self.turn
    }

    /// Scores the round won by `winner`; returns whether the match ended.
    fn finish_round(&mut self, winner: usize) -> bool {
        self.phase = MatchPhase::RoundOver;
        self.round_winner = Some(winner);

        let penalties = score_round(&self.players, self.config.cards_per_player());
        self.scores.apply_round(&penalties);
        let record = RoundRecord {
            round_number: self.round_number,
            winner,
            penalties: self.round_scores(),
        };
        event!(
            Level::INFO,
            round = self.round_number,
            winner = %self.players[winner].id(),
            penalties = ?record.penalties,
            "round won"
        );
        self.history.push(record);

        if self.scores.reached(self.config.target_score) {
            let leader = self.scores.leading_seat();
            self.phase = MatchPhase::MatchOver;
            self.match_winner = Some(leader);
            event!(
                Level::INFO,
                round = self.round_number,
                target = self.config.target_score,
                winner = %self.players[leader].id(),
                score = self.scores.score(leader),
                "match over"
            );
            true
        } else {
            false
        }
    }

    fn reset_match(&mut self) {
        self.scores.reset();
        self.history.clear();
        self.round_number = 1;
        self.match_winner = None;
        self.deal_round();
        event!(Level::INFO, leader = self.turn, "new match dealt");
    }

    fn deal_round(&mut self) {
        let per_player = self.config.cards_per_player();
        self.undealt = Deck::shuffled(&mut self.rng);
        for player in &mut self.players {
            let cards = match self.undealt.deal(per_player) {
                Some(cards) => cards,
                None => {
                    event!(Level::ERROR, player = %player.id(), per_player, "deck ran out while dealing");
                    Vec::new()
                }
            };
            *player.hand_mut() = Hand::with_cards(cards);
        }
        self.start_round();
    }

    fn start_round(&mut self) {
        self.standing = None;
        self.discard.clear();
        self.pass_count = 0;
        self.phase = MatchPhase::Playing;
        self.round_winner = None;
        self.players.iter_mut().for_each(|p| p.set_passed(false));
        self.turn = self
            .players
            .iter()
            .position(|p| p.hand().contains(Card::OPENING))
            .unwrap_or(0);
    }
}
