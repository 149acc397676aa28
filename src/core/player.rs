//! Per-side player state

use crate::core::{DefId, ManaPool, Side};
use crate::zones::PlayerZones;
use serde::{Deserialize, Serialize};

/// Action points granted at the start of each turn.
pub const ACTIONS_PER_TURN: u32 = 3;

/// Opening hand size.
pub const OPENING_HAND_SIZE: usize = 5;

/// State for one side of the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub side: Side,

    /// The identity/hero definition for this side. Identities are not card
    /// instances; they never occupy a zone.
    pub identity: DefId,

    pub mana: ManaPool,

    /// The per-turn resource spent to take game actions.
    pub action_points: u32,

    pub score: u32,

    pub zones: PlayerZones,

    /// Set once this side has kept or mulliganed its opening hand.
    pub mulligan_decided: bool,
}

impl PlayerState {
    pub fn new(side: Side, identity: DefId) -> Self {
        PlayerState {
            side,
            identity,
            mana: ManaPool::new(),
            action_points: 0,
            score: 0,
            zones: PlayerZones::new(),
            mulligan_decided: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = PlayerState::new(Side::Champion, DefId::new(1));
        assert_eq!(player.side, Side::Champion);
        assert_eq!(player.action_points, 0);
        assert_eq!(player.score, 0);
        assert!(!player.mulligan_decided);
        assert!(player.zones.deck.is_empty());
    }
}
