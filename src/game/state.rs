//! Canonical game state
//!
//! `GameState` is the root aggregate: it owns every card instance, both
//! player states, the turn/phase trackers and the RNG. It is mutated
//! exclusively through the precondition-checked mutators below; a failed
//! precondition is a `RuleViolation`-class error, never a silent clamp.

use crate::core::{
    CardId, CardState, CounterKind, DefId, GameId, ManaKind, PerSide, PlayerState, RoomId, Side,
};
use crate::game::{GamePhase, GameStatus, TurnState};
use crate::zones::{Zone, ZoneAddr};
use crate::{EngineError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Seeded gameplay RNG with a draw cursor.
///
/// The cursor counts draws so a replay can verify it is consuming
/// randomness at exactly the positions the original game did. The RNG is
/// threaded through state rather than being a process global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    seed: u64,
    cursor: u64,
    rng: ChaCha12Rng,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        GameRng {
            seed,
            cursor: 0,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws taken so far.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Shuffle a card list. Counts as one draw.
    pub fn shuffle(&mut self, cards: &mut [CardId]) {
        use rand::seq::SliceRandom;
        self.cursor += 1;
        cards.shuffle(&mut self.rng);
    }

    /// Pick a uniform index below `len`. Counts as one draw.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.cursor += 1;
        self.rng.gen_range(0..len)
    }
}

/// State of an in-progress raid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidState {
    pub room: RoomId,
    /// Index of the defender currently being fought.
    pub encounter: usize,
}

/// Complete state of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,

    /// All card instances, keyed by id
    pub cards: FxHashMap<CardId, CardState>,

    pub players: PerSide<PlayerState>,

    pub turn: TurnState,

    pub phase: GamePhase,

    /// Present only while a raid resolves
    pub raid: Option<RaidState>,

    pub rng: GameRng,

    /// At most one action may be in flight; set for the duration of the
    /// resolution loop.
    pub pending_action: bool,

    pub status: GameStatus,

    /// Card instance id allocator (never reused)
    next_card_id: u32,

    /// Render sort key allocator
    next_position: u32,
}

impl GameState {
    pub fn new(id: GameId, seed: u64, identities: PerSide<DefId>) -> Self {
        GameState {
            id,
            cards: FxHashMap::default(),
            players: PerSide::new(
                PlayerState::new(Side::Overlord, identities.overlord),
                PlayerState::new(Side::Champion, identities.champion),
            ),
            turn: TurnState::new(Side::Overlord),
            phase: GamePhase::Setup,
            raid: None,
            rng: GameRng::new(seed),
            pending_action: false,
            status: GameStatus::Active,
            next_card_id: 0,
            next_position: 0,
        }
    }

    // --- Accessors ---

    pub fn card(&self, id: CardId) -> Result<&CardState> {
        self.cards
            .get(&id)
            .ok_or(EngineError::UnknownIdentifier(id.as_u32()))
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut CardState> {
        self.cards
            .get_mut(&id)
            .ok_or(EngineError::UnknownIdentifier(id.as_u32()))
    }

    pub fn player(&self, side: Side) -> &PlayerState {
        self.players.get(side)
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        self.players.get_mut(side)
    }

    /// Cards in one container, in container order.
    pub fn cards_in(&self, addr: ZoneAddr) -> &[CardId] {
        &self.player(addr.side).zones.get_zone(addr.zone).cards
    }

    /// Overlord cards placed in a room, in placement order. Minion
    /// filtering for raids happens at the registry layer.
    pub fn room_cards(&self, room: RoomId) -> &[CardId] {
        self.cards_in(ZoneAddr::new(Side::Overlord, Zone::Room(room)))
    }

    /// All in-play cards across both sides, in stable order. Used for
    /// static-ability queries and replacement scans.
    pub fn cards_in_play(&self) -> Vec<CardId> {
        let mut out = Vec::new();
        for (_, player) in self.players.iter() {
            for (zone, id) in player.zones.iter_all() {
                if zone.is_in_play() {
                    out.push(id);
                }
            }
        }
        out
    }

    // --- Id allocation ---

    pub fn next_card_id(&mut self) -> CardId {
        let id = CardId::new(self.next_card_id);
        self.next_card_id += 1;
        id
    }

    pub fn next_position(&mut self) -> u32 {
        let pos = self.next_position;
        self.next_position += 1;
        pos
    }

    // --- Mutators (precondition-checked, deterministic) ---

    /// Create a card instance directly into a container. Used during setup
    /// and token creation.
    pub fn create_card(
        &mut self,
        def: DefId,
        owner: Side,
        location: ZoneAddr,
        parent: Option<CardId>,
    ) -> CardId {
        let id = self.next_card_id();
        let position = self.next_position();
        let mut card = CardState::new(id, def, owner);
        card.location = location;
        card.position = position;
        card.parent = parent;
        self.cards.insert(id, card);
        self.player_mut(location.side)
            .zones
            .get_zone_mut(location.zone)
            .add(id);
        id
    }

    /// Move a card between containers. Fails if the card is not where the
    /// caller claims it is.
    pub fn move_card(&mut self, card_id: CardId, from: ZoneAddr, to: ZoneAddr) -> Result<()> {
        let card = self.card(card_id)?;
        if card.location != from {
            return Err(EngineError::RuleViolation(format!(
                "{card_id} is in {} but was expected in {from}",
                card.location
            )));
        }
        let removed = self
            .player_mut(from.side)
            .zones
            .get_zone_mut(from.zone)
            .remove(card_id);
        if !removed {
            return Err(EngineError::RuleViolation(format!(
                "{card_id} missing from container {from}"
            )));
        }
        self.player_mut(to.side).zones.get_zone_mut(to.zone).add(card_id);
        let position = self.next_position();
        let card = self.card_mut(card_id)?;
        card.location = to;
        card.position = position;
        Ok(())
    }

    /// Adjust a mana pool. Negative deltas fail rather than clamp.
    pub fn adjust_mana(&mut self, side: Side, kind: ManaKind, delta: i64) -> Result<()> {
        let pool = &mut self.player_mut(side).mana;
        if delta >= 0 {
            pool.gain(kind, delta as u32);
            Ok(())
        } else {
            pool.remove(kind, (-delta) as u32)
        }
    }

    /// Pay a cost that may draw on restricted mana.
    pub fn pay_mana(&mut self, side: Side, amount: u32, allow_restricted: bool) -> Result<()> {
        self.player_mut(side).mana.pay(amount, allow_restricted)
    }

    pub fn adjust_action_points(&mut self, side: Side, delta: i64) -> Result<()> {
        let player = self.player_mut(side);
        let current = player.action_points as i64;
        let next = current + delta;
        if next < 0 {
            return Err(EngineError::InsufficientActionPoints {
                needed: (-delta) as u32,
                available: player.action_points,
            });
        }
        player.action_points = next as u32;
        Ok(())
    }

    pub fn adjust_score(&mut self, side: Side, delta: i64) -> Result<()> {
        let player = self.player_mut(side);
        let next = player.score as i64 + delta;
        if next < 0 {
            return Err(EngineError::RuleViolation(format!(
                "score for {side} would go negative"
            )));
        }
        player.score = next as u32;
        Ok(())
    }

    pub fn set_revealed(&mut self, card_id: CardId, side: Side, revealed: bool) -> Result<()> {
        let card = self.card_mut(card_id)?;
        *card.revealed_to.get_mut(side) = revealed;
        Ok(())
    }

    pub fn add_counters(&mut self, card_id: CardId, kind: CounterKind, count: u32) -> Result<()> {
        self.card_mut(card_id)?.add_counters(kind, count);
        Ok(())
    }

    pub fn remove_counters(
        &mut self,
        card_id: CardId,
        kind: CounterKind,
        count: u32,
    ) -> Result<()> {
        let card = self.card_mut(card_id)?;
        if !card.remove_counters(kind, count) {
            return Err(EngineError::RuleViolation(format!(
                "{card_id} lacks {count} {kind:?} counters"
            )));
        }
        Ok(())
    }

    // --- Invariants ---

    /// Verify the zone partition: every card appears in exactly one
    /// container, and that container agrees with the card's own location.
    pub fn check_zone_partition(&self) -> Result<()> {
        let mut seen: FxHashMap<CardId, ZoneAddr> = FxHashMap::default();
        for (side, player) in self.players.iter() {
            for (zone, id) in player.zones.iter_all() {
                let addr = ZoneAddr::new(side, zone);
                if let Some(prior) = seen.insert(id, addr) {
                    return Err(EngineError::RuleViolation(format!(
                        "{id} appears in both {prior} and {addr}"
                    )));
                }
                let card = self.card(id)?;
                if card.location != addr {
                    return Err(EngineError::RuleViolation(format!(
                        "{id} thinks it is in {} but the container is {addr}",
                        card.location
                    )));
                }
            }
        }
        if seen.len() != self.cards.len() {
            return Err(EngineError::RuleViolation(format!(
                "{} cards tracked but {} in containers",
                self.cards.len(),
                seen.len()
            )));
        }
        Ok(())
    }
}
