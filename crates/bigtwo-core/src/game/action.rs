use crate::model::card::Card;

/// Everything a seated player can ask the match to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    PlayCards(Vec<Card>),
    PassTurn,
    NewGame,
    SetAlias(String),
}

impl Action {
    pub const fn kind(&self) -> &'static str {
        match self {
            Action::PlayCards(_) => "playCards",
            Action::PassTurn => "passTurn",
            Action::NewGame => "newGame",
            Action::SetAlias(_) => "setAlias",
        }
    }
}

/// What an accepted action did to the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Cards accepted; play moves to the next seat.
    Played { next_seat: usize },
    /// Cards accepted and the player went out.
    RoundWon { winner: usize, match_over: bool },
    /// Pass accepted; the trick is still live.
    Passed { next_seat: usize },
    /// Every other player passed, so the table was cleared and `leader` starts fresh.
    TrickReset { leader: usize },
    NextRound { round_number: u32, leader: usize },
    /// A fresh match was dealt. `abandoned` is set when a live round was thrown away.
    NewMatch { leader: usize, abandoned: bool },
    AliasChanged,
}

impl Outcome {
    /// Every accepted action changes what players see.
    pub const fn requires_broadcast(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Outcome};

    #[test]
    fn kinds_match_wire_names() {
        assert_eq!(Action::PlayCards(Vec::new()).kind(), "playCards");
        assert_eq!(Action::PassTurn.kind(), "passTurn");
        assert_eq!(Action::NewGame.kind(), "newGame");
        assert_eq!(Action::SetAlias(String::new()).kind(), "setAlias");
    }

    #[test]
    fn accepted_actions_broadcast() {
        assert!(Outcome::AliasChanged.requires_broadcast());
        assert!(Outcome::Passed { next_seat: 1 }.requires_broadcast());
    }
}
