//! Error types for the Spellkeep engine

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // Validation errors: user-correctable, surfaced to the acting client,
    // no state change.
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Another action is pending resolution")]
    ActionPending,

    #[error("Action not legal in the {0} phase")]
    WrongPhase(String),

    #[error("Insufficient mana: need {needed}, have {available}")]
    InsufficientMana { needed: u32, available: u32 },

    #[error("Insufficient action points: need {needed}, have {available}")]
    InsufficientActionPoints { needed: u32, available: u32 },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Deck is empty")]
    DeckEmpty,

    #[error("Game is over")]
    GameOver,

    // Engine defects: never a player mistake.
    #[error("Rule violation: {0}")]
    RuleViolation(String),

    #[error("Unknown card definition: {0}")]
    UnknownCard(u32),

    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(u32),

    #[error("Trigger cascade exceeded the depth limit of {0}")]
    StackOverflowGuard(usize),
}

impl EngineError {
    /// True for errors the acting player can correct by choosing a
    /// different action. Everything else is an engine or data defect.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            EngineError::RuleViolation(_)
                | EngineError::UnknownCard(_)
                | EngineError::UnknownIdentifier(_)
                | EngineError::StackOverflowGuard(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(EngineError::NotYourTurn.is_validation());
        assert!(EngineError::DeckEmpty.is_validation());
        assert!(EngineError::InsufficientMana {
            needed: 3,
            available: 1
        }
        .is_validation());

        assert!(!EngineError::RuleViolation("bad".to_string()).is_validation());
        assert!(!EngineError::UnknownCard(7).is_validation());
        assert!(!EngineError::StackOverflowGuard(128).is_validation());
    }
}
