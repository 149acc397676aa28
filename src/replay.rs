//! Deterministic replay
//!
//! A game is fully reproducible from its config plus the ordered log of
//! (side, action, RNG-cursor) entries. The cursor recorded before each
//! action lets a replay verify it is consuming randomness at exactly the
//! positions the original run did; any divergence is reported rather
//! than silently producing a different game.

use crate::core::{GameId, Side};
use crate::game::actions::UserAction;
use crate::game::orchestrator::{initialize_game, GameConfig};
use crate::game::state::GameState;
use crate::game::{resolver, validator};
use crate::registry::CardRegistry;
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// One logged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub side: Side,
    pub action: UserAction,
    /// RNG draw count observed immediately before this action resolved
    pub rng_cursor: u64,
}

/// The persisted form of a game: enough to reproduce any state
/// bit-for-bit, for bug reports and self-play evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub game_id: GameId,
    pub config: GameConfig,
    pub entries: Vec<ReplayEntry>,
}

impl ReplayLog {
    pub fn new(game_id: GameId, config: GameConfig) -> Self {
        ReplayLog {
            game_id,
            config,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, side: Side, action: UserAction, rng_cursor: u64) {
        self.entries.push(ReplayEntry {
            side,
            action,
            rng_cursor,
        });
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::RuleViolation(format!("replay serialization: {e}")))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EngineError::RuleViolation(format!("replay deserialization: {e}")))
    }
}

/// Re-run a log from setup. Fails on any RNG-cursor divergence or any
/// action the rebuilt state rejects.
pub fn replay(log: &ReplayLog) -> Result<GameState> {
    let registry = CardRegistry::global();
    let mut state = initialize_game(log.game_id, &log.config, registry)?;

    for (index, entry) in log.entries.iter().enumerate() {
        let cursor = state.rng.cursor();
        if cursor != entry.rng_cursor {
            return Err(EngineError::RuleViolation(format!(
                "replay diverged at entry {index}: cursor {cursor}, log says {}",
                entry.rng_cursor
            )));
        }
        validator::validate(&state, entry.side, &entry.action, registry)?;
        resolver::resolve_action(&mut state, entry.side, &entry.action, registry)?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_reproduces_state() {
        let config = GameConfig::with_seed(11);
        let registry = CardRegistry::global();
        let id = GameId::new(5);

        let mut log = ReplayLog::new(id, config.clone());
        let mut state = initialize_game(id, &config, registry).unwrap();

        for (side, action) in [
            (Side::Overlord, UserAction::keep_hand()),
            (Side::Champion, UserAction::mulligan()),
            (Side::Overlord, UserAction::GainMana),
            (Side::Overlord, UserAction::end_turn()),
            (Side::Champion, UserAction::GainMana),
        ] {
            let cursor = state.rng.cursor();
            resolver::resolve_action(&mut state, side, &action, registry).unwrap();
            log.record(side, action, cursor);
        }

        let rebuilt = replay(&log).unwrap();
        assert_eq!(
            serde_json::to_string(&rebuilt).unwrap(),
            serde_json::to_string(&state).unwrap()
        );
    }

    #[test]
    fn test_replay_detects_cursor_divergence() {
        let config = GameConfig::with_seed(11);
        let mut log = ReplayLog::new(GameId::new(5), config);
        log.record(Side::Overlord, UserAction::keep_hand(), 99);

        let err = replay(&log).unwrap_err();
        assert!(matches!(err, EngineError::RuleViolation(_)));
    }

    #[test]
    fn test_log_json_round_trip() {
        let mut log = ReplayLog::new(GameId::new(2), GameConfig::with_seed(4));
        log.record(Side::Overlord, UserAction::keep_hand(), 2);
        log.record(Side::Champion, UserAction::GainMana, 2);

        let json = log.to_json().unwrap();
        let back = ReplayLog::from_json(&json).unwrap();
        assert_eq!(log, back);
    }
}
