//! Phases and turn structure

use crate::core::Side;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points a side needs to win.
pub const POINTS_TO_WIN: u32 = 7;

/// The phase state machine driven by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Decks are being built and shuffled; no player actions yet.
    Setup,
    /// Both sides decide whether to keep their opening hand.
    Mulligan,
    /// Normal play; the named side holds the action window.
    ActivePlay(Side),
    /// A raid is resolving.
    RaidResolution,
    /// Scores are being settled into a result.
    Scoring,
    /// Terminal; no further actions are accepted.
    GameOver,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Setup => write!(f, "Setup"),
            GamePhase::Mulligan => write!(f, "Mulligan"),
            GamePhase::ActivePlay(side) => write!(f, "ActivePlay({side})"),
            GamePhase::RaidResolution => write!(f, "RaidResolution"),
            GamePhase::Scoring => write!(f, "Scoring"),
            GamePhase::GameOver => write!(f, "GameOver"),
        }
    }
}

impl GamePhase {
    /// Whose action window is open, if anyone's.
    pub fn acting_side(&self) -> Option<Side> {
        match self {
            GamePhase::ActivePlay(side) => Some(*side),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver)
    }
}

/// Overall health of a game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    /// An engine invariant broke mid-resolution; the game needs
    /// investigation and accepts no further actions.
    Degraded,
    Finished { winner: Option<Side> },
}

/// Turn counter and pass tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Current turn number (starts at 1 when ActivePlay begins)
    pub number: u32,

    /// Side whose turn it is
    pub active_side: Side,

    /// Actions resolved this turn, the turn-ending action excluded
    pub actions_taken_this_turn: u32,

    /// Consecutive turns ended without taking any action. Two in a row
    /// close out ActivePlay into Scoring.
    pub consecutive_passes: u8,
}

impl TurnState {
    pub fn new(starting_side: Side) -> Self {
        TurnState {
            number: 1,
            active_side: starting_side,
            actions_taken_this_turn: 0,
            consecutive_passes: 0,
        }
    }

    /// Record a resolved non-terminal action.
    pub fn record_action(&mut self) {
        self.actions_taken_this_turn += 1;
    }

    /// Hand the turn to `next`. Returns true if this end-of-turn was the
    /// second consecutive pass.
    pub fn end_turn(&mut self, next: Side) -> bool {
        if self.actions_taken_this_turn == 0 {
            self.consecutive_passes += 1;
        } else {
            self.consecutive_passes = 0;
        }
        self.number += 1;
        self.active_side = next;
        self.actions_taken_this_turn = 0;
        self.consecutive_passes >= 2
    }
}
