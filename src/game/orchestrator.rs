//! Session and turn orchestration
//!
//! `GameSessions` is the single entry point external callers use: the
//! network layer and AI both submit through `submit_action`, which owns
//! the per-game lock for the whole resolution loop. Nothing outside this
//! module ever holds a mutable reference to a live `GameState`.

use crate::commands::{build_game_view, CommandList, GameView};
use crate::core::{DefId, GameId, PerSide, Side, OPENING_HAND_SIZE};
use crate::game::actions::UserAction;
use crate::game::mutation::Mutation;
use crate::game::state::GameState;
use crate::game::{resolver, validator, GamePhase};
use crate::registry::{sets, CardKind, CardRegistry};
use crate::replay::ReplayLog;
use crate::zones::{Zone, ZoneAddr};
use crate::{EngineError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Everything needed to start a game deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub seed: u64,
    pub identities: PerSide<DefId>,
    pub decks: PerSide<Vec<DefId>>,
}

impl GameConfig {
    /// Base-set decks with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        GameConfig {
            seed,
            identities: PerSide::new(sets::OVERLORD_IDENTITY, sets::CHAMPION_IDENTITY),
            decks: PerSide::new(sets::default_overlord_deck(), sets::default_champion_deck()),
        }
    }
}

/// Build a fresh game from a config: validate every definition, deal the
/// decks, shuffle, draw opening hands and open the mulligan window.
pub(crate) fn initialize_game(
    id: GameId,
    config: &GameConfig,
    registry: &CardRegistry,
) -> Result<GameState> {
    // Unknown identifiers are fatal at load, before any card exists.
    for (_, &identity) in config.identities.iter() {
        let def = registry.lookup(identity)?;
        if def.kind != CardKind::Identity {
            return Err(EngineError::RuleViolation(format!(
                "{identity} is not an identity definition"
            )));
        }
    }
    for (_, deck) in config.decks.iter() {
        for &def_id in deck {
            let def = registry.lookup(def_id)?;
            if def.token {
                return Err(EngineError::RuleViolation(format!(
                    "token {def_id} cannot be decked"
                )));
            }
        }
    }

    let mut state = GameState::new(id, config.seed, config.identities);
    for side in [Side::Overlord, Side::Champion] {
        let deck_addr = ZoneAddr::new(side, Zone::Deck);
        for &def_id in config.decks.get(side) {
            state.create_card(def_id, side, deck_addr, None);
        }
        Mutation::ShuffleDeck { side }.apply(&mut state, registry)?;
        for _ in 0..OPENING_HAND_SIZE.min(config.decks.get(side).len()) {
            Mutation::DrawFromDeck { side }.apply(&mut state, registry)?;
        }
    }
    state.phase = GamePhase::Mulligan;
    log::info!("{id}: game initialized (seed {})", config.seed);
    Ok(state)
}

/// One running game behind its lock.
#[derive(Debug)]
pub struct GameSession {
    pub state: GameState,
    pub replay: ReplayLog,
}

/// The inbound boundary: owns every live game, each behind its own
/// mutex. Cross-game submissions run fully in parallel; same-game
/// submissions serialize.
pub struct GameSessions {
    registry: &'static CardRegistry,
    games: Mutex<FxHashMap<GameId, Arc<Mutex<GameSession>>>>,
    next_game_id: AtomicU64,
}

impl GameSessions {
    pub fn new() -> Self {
        GameSessions {
            registry: CardRegistry::global(),
            games: Mutex::new(FxHashMap::default()),
            next_game_id: AtomicU64::new(1),
        }
    }

    pub fn create_game(&self, config: GameConfig) -> Result<GameId> {
        let id = GameId::new(self.next_game_id.fetch_add(1, Ordering::Relaxed));
        let state = initialize_game(id, &config, self.registry)?;
        let session = GameSession {
            state,
            replay: ReplayLog::new(id, config),
        };
        self.games
            .lock()
            .map_err(|_| EngineError::RuleViolation("session table poisoned".to_string()))?
            .insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    fn session(&self, id: GameId) -> Result<Arc<Mutex<GameSession>>> {
        self.games
            .lock()
            .map_err(|_| EngineError::RuleViolation("session table poisoned".to_string()))?
            .get(&id)
            .cloned()
            .ok_or(EngineError::UnknownIdentifier(id.as_u64() as u32))
    }

    /// Submit one action. The per-game lock is held for the entire
    /// validate-resolve sequence and released on every exit path,
    /// rejection and resolver failure included (the guard is scoped).
    pub fn submit_action(
        &self,
        game: GameId,
        side: Side,
        action: UserAction,
    ) -> Result<PerSide<CommandList>> {
        let session = self.session(game)?;
        let mut guard = session
            .lock()
            .map_err(|_| EngineError::RuleViolation(format!("{game} lock poisoned")))?;

        validator::validate(&guard.state, side, &action, self.registry)?;
        let cursor = guard.state.rng.cursor();
        let lists = resolver::resolve_action(&mut guard.state, side, &action, self.registry)?;
        guard.replay.record(side, action, cursor);
        Ok(lists)
    }

    /// The view one recipient is entitled to, for initial sync.
    pub fn game_view(&self, game: GameId, side: Side) -> Result<GameView> {
        let session = self.session(game)?;
        let guard = session
            .lock()
            .map_err(|_| EngineError::RuleViolation(format!("{game} lock poisoned")))?;
        Ok(build_game_view(&guard.state, side))
    }

    /// Snapshot the replay log for persistence or bug reports.
    pub fn replay_log(&self, game: GameId) -> Result<ReplayLog> {
        let session = self.session(game)?;
        let guard = session
            .lock()
            .map_err(|_| EngineError::RuleViolation(format!("{game} lock poisoned")))?;
        Ok(guard.replay.clone())
    }

    /// Clone the canonical state, for diagnostics and tests. External
    /// callers never receive a live reference.
    pub fn state_snapshot(&self, game: GameId) -> Result<GameState> {
        let session = self.session(game)?;
        let guard = session
            .lock()
            .map_err(|_| EngineError::RuleViolation(format!("{game} lock poisoned")))?;
        Ok(guard.state.clone())
    }

    /// Remove a finished or abandoned game.
    pub fn remove_game(&self, game: GameId) -> Result<()> {
        self.games
            .lock()
            .map_err(|_| EngineError::RuleViolation("session table poisoned".to_string()))?
            .remove(&game)
            .map(|_| ())
            .ok_or(EngineError::UnknownIdentifier(game.as_u64() as u32))
    }
}

impl Default for GameSessions {
    fn default() -> Self {
        Self::new()
    }
}

/// The AI/search boundary: apply an action to a state *copy*, with no
/// side effects outside the returned value. External tree search pairs
/// this with `legal_actions`.
pub fn apply_action(
    state: &GameState,
    side: Side,
    action: &UserAction,
) -> Result<(GameState, PerSide<CommandList>)> {
    let registry = CardRegistry::global();
    validator::validate(state, side, action, registry)?;
    let mut next = state.clone();
    let lists = resolver::resolve_action(&mut next, side, action, registry)?;
    Ok((next, lists))
}
