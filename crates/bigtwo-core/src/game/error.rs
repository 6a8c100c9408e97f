use crate::rules::ClassifyError;
use thiserror::Error;

/// Why an action was refused. The match is left exactly as it was.
///
/// Everything except [`ActionError::InvariantViolation`] is a user mistake
/// and its message goes back to the acting player only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Seat {0} is not part of this match.")]
    UnknownSeat(usize),
    #[error("The match is over. Start a new game.")]
    MatchOver,
    #[error("Game is over.")]
    RoundOver,
    #[error("It's not your turn. Currently Player {current}'s turn.")]
    NotYourTurn { current: String },
    #[error("It's not your turn to pass. Currently Player {current}'s turn.")]
    NotYourTurnToPass { current: String },
    #[error("Invalid play: You do not possess all the cards you are trying to play.")]
    CardsNotHeld,
    #[error("Invalid hand: {0}")]
    InvalidHand(#[from] ClassifyError),
    #[error("Your hand does not beat the hand on the table.")]
    DoesNotBeat,
    #[error("You cannot pass when you are leading a new trick.")]
    CannotPassLead,
    #[error("Server error: {0}. Play aborted.")]
    InvariantViolation(String),
}

impl ActionError {
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ActionError::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::ActionError;
    use crate::rules::ClassifyError;

    #[test]
    fn classify_errors_are_wrapped_with_context() {
        let err: ActionError = ClassifyError::NotAPair.into();
        assert_eq!(err.to_string(), "Invalid hand: not a valid pair (ranks differ)");
        assert!(err.is_user_error());
    }

    #[test]
    fn invariant_violations_are_not_user_errors() {
        let err = ActionError::InvariantViolation("could not remove cards from hand".into());
        assert!(!err.is_user_error());
        assert_eq!(
            err.to_string(),
            "Server error: could not remove cards from hand. Play aborted."
        );
    }
}
