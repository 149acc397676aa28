//! Atomic state mutations
//!
//! Effects never touch `GameState` directly: they describe mutations,
//! and the resolver stages, possibly replaces, then commits them one at a
//! time. Each commit checks its own precondition and fails with a
//! `RuleViolation`-class error if the state no longer supports it.

use crate::core::{CardId, CounterKind, DefId, ManaKind, Side};
use crate::game::{GamePhase, GameStatus, RaidState};
use crate::game::state::GameState;
use crate::registry::CardRegistry;
use crate::zones::{Zone, ZoneAddr};
use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// One atomic, renderable state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Move a card between containers
    MoveCard {
        card: CardId,
        from: ZoneAddr,
        to: ZoneAddr,
    },

    /// Draw the top card of a deck into its hand
    DrawFromDeck { side: Side },

    /// Shuffle a deck (consumes one RNG draw)
    ShuffleDeck { side: Side },

    /// Return an entire hand to its deck (mulligan)
    ReturnHandToDeck { side: Side },

    /// Gain or lose mana of one kind
    AdjustMana {
        side: Side,
        kind: ManaKind,
        delta: i64,
    },

    /// Pay a cost, drawing on restricted mana where permitted
    PayMana {
        side: Side,
        amount: u32,
        allow_restricted: bool,
    },

    AdjustActionPoints { side: Side, delta: i64 },

    /// Reset action points at the start of a turn
    SetActionPoints { side: Side, value: u32 },

    AdjustScore { side: Side, delta: i64 },

    SetRevealed {
        card: CardId,
        side: Side,
        revealed: bool,
    },

    AddCounters {
        card: CardId,
        kind: CounterKind,
        count: u32,
    },

    RemoveCounters {
        card: CardId,
        kind: CounterKind,
        count: u32,
    },

    /// Create a token card in play
    CreateToken {
        def: DefId,
        owner: Side,
        location: ZoneAddr,
        parent: CardId,
    },

    /// Destroy an in-play card (commits as a move to its owner's discard).
    /// Interceptable by `ReplacedEvent::Destroyed`.
    DestroyCard { card: CardId },

    /// The Champion captures a scheme during a raid access.
    /// Interceptable by `ReplacedEvent::Captured`.
    CaptureScheme { card: CardId },

    /// The Overlord scores a scheme that reached its threshold
    ScoreScheme { card: CardId },

    /// Discard a card from hand
    DiscardFromHand { card: CardId },

    /// Discard a uniformly random card from a hand (consumes one RNG draw)
    DiscardRandomFromHand { side: Side },

    /// Record a side's mulligan decision
    DecideMulligan { side: Side },

    SetPhase { phase: GamePhase },

    SetStatus { status: GameStatus },

    /// Hand the turn to `next`, updating pass bookkeeping
    AdvanceTurn { next: Side },

    SetRaid { raid: Option<RaidState> },
}

/// Facts recorded when a mutation commits, for the emitter's benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applied {
    None,
    /// A card changed container
    Moved {
        card: CardId,
        from: ZoneAddr,
        to: ZoneAddr,
    },
    /// A card was drawn
    Drew { card: CardId },
    /// A token was created
    Created { card: CardId },
    /// A scheme changed hands or scored, worth `points`
    Scored { card: CardId, points: u32 },
    /// A random hand card was discarded
    Discarded { card: CardId },
}

impl Mutation {
    /// Commit this mutation against live state. Deterministic given
    /// identical state and RNG cursor.
    pub fn apply(&self, state: &mut GameState, registry: &CardRegistry) -> Result<Applied> {
        match *self {
            Mutation::MoveCard { card, from, to } => {
                state.move_card(card, from, to)?;
                Ok(Applied::Moved { card, from, to })
            }

            Mutation::DrawFromDeck { side } => {
                let deck = &mut state.player_mut(side).zones.deck;
                let card = deck.draw_top().ok_or_else(|| {
                    EngineError::RuleViolation(format!("draw from empty {side} deck"))
                })?;
                let hand = ZoneAddr::new(side, Zone::Hand);
                let position = state.next_position();
                let card_state = state.card_mut(card)?;
                card_state.location = hand;
                card_state.position = position;
                *card_state.revealed_to.get_mut(side) = true;
                state.player_mut(side).zones.hand.add(card);
                Ok(Applied::Drew { card })
            }

            Mutation::ShuffleDeck { side } => {
                // Split borrow: take the deck out, shuffle, put it back.
                let mut cards = std::mem::take(&mut state.player_mut(side).zones.deck.cards);
                state.rng.shuffle(&mut cards);
                state.player_mut(side).zones.deck.cards = cards;
                Ok(Applied::None)
            }

            Mutation::ReturnHandToDeck { side } => {
                let hand: Vec<CardId> =
                    std::mem::take(&mut state.player_mut(side).zones.hand.cards);
                let deck = ZoneAddr::new(side, Zone::Deck);
                for card in hand {
                    let card_state = state.card_mut(card)?;
                    card_state.location = deck;
                    *card_state.revealed_to.get_mut(side) = false;
                    state.player_mut(side).zones.deck.add(card);
                }
                Ok(Applied::None)
            }

            Mutation::AdjustMana { side, kind, delta } => {
                state.adjust_mana(side, kind, delta)?;
                Ok(Applied::None)
            }

            Mutation::PayMana {
                side,
                amount,
                allow_restricted,
            } => {
                state.pay_mana(side, amount, allow_restricted)?;
                Ok(Applied::None)
            }

            Mutation::AdjustActionPoints { side, delta } => {
                state.adjust_action_points(side, delta)?;
                Ok(Applied::None)
            }

            Mutation::SetActionPoints { side, value } => {
                state.player_mut(side).action_points = value;
                Ok(Applied::None)
            }

            Mutation::AdjustScore { side, delta } => {
                state.adjust_score(side, delta)?;
                Ok(Applied::None)
            }

            Mutation::SetRevealed {
                card,
                side,
                revealed,
            } => {
                state.set_revealed(card, side, revealed)?;
                Ok(Applied::None)
            }

            Mutation::AddCounters { card, kind, count } => {
                state.add_counters(card, kind, count)?;
                Ok(Applied::None)
            }

            Mutation::RemoveCounters { card, kind, count } => {
                state.remove_counters(card, kind, count)?;
                Ok(Applied::None)
            }

            Mutation::CreateToken {
                def,
                owner,
                location,
                parent,
            } => {
                registry.lookup(def)?;
                let card = state.create_card(def, owner, location, Some(parent));
                // Tokens enter play face-up for both sides.
                state.set_revealed(card, Side::Overlord, true)?;
                state.set_revealed(card, Side::Champion, true)?;
                Ok(Applied::Created { card })
            }

            Mutation::DestroyCard { card } => {
                let from = state.card(card)?.location;
                if !from.zone.is_in_play() {
                    return Err(EngineError::RuleViolation(format!(
                        "{card} destroyed while not in play ({from})"
                    )));
                }
                let owner = state.card(card)?.owner;
                let to = ZoneAddr::new(owner, Zone::Discard);
                state.move_card(card, from, to)?;
                // Discard piles are public.
                state.set_revealed(card, Side::Overlord, true)?;
                state.set_revealed(card, Side::Champion, true)?;
                Ok(Applied::Moved { card, from, to })
            }

            Mutation::CaptureScheme { card } => {
                let (from, def) = {
                    let c = state.card(card)?;
                    (c.location, c.def)
                };
                if !matches!(from.zone, Zone::Room(_)) {
                    return Err(EngineError::RuleViolation(format!(
                        "{card} captured outside a room ({from})"
                    )));
                }
                let points = registry
                    .lookup(def)?
                    .stats
                    .scheme_points
                    .ok_or_else(|| {
                        EngineError::RuleViolation(format!("{card} has no scheme points"))
                    })?;
                let to = ZoneAddr::new(Side::Champion, Zone::Score);
                state.move_card(card, from, to)?;
                state.set_revealed(card, Side::Overlord, true)?;
                state.set_revealed(card, Side::Champion, true)?;
                state.adjust_score(Side::Champion, points as i64)?;
                Ok(Applied::Scored { card, points })
            }

            Mutation::ScoreScheme { card } => {
                let (from, def) = {
                    let c = state.card(card)?;
                    (c.location, c.def)
                };
                if !matches!(from.zone, Zone::Room(_)) {
                    return Err(EngineError::RuleViolation(format!(
                        "{card} scored outside a room ({from})"
                    )));
                }
                let points = registry
                    .lookup(def)?
                    .stats
                    .scheme_points
                    .ok_or_else(|| {
                        EngineError::RuleViolation(format!("{card} has no scheme points"))
                    })?;
                let to = ZoneAddr::new(Side::Overlord, Zone::Score);
                state.move_card(card, from, to)?;
                state.set_revealed(card, Side::Overlord, true)?;
                state.set_revealed(card, Side::Champion, true)?;
                state.adjust_score(Side::Overlord, points as i64)?;
                Ok(Applied::Scored { card, points })
            }

            Mutation::DiscardFromHand { card } => {
                let (from, owner) = {
                    let c = state.card(card)?;
                    (c.location, c.owner)
                };
                if from.zone != Zone::Hand {
                    return Err(EngineError::RuleViolation(format!(
                        "{card} discarded from {from}, not a hand"
                    )));
                }
                let to = ZoneAddr::new(owner, Zone::Discard);
                state.move_card(card, from, to)?;
                state.set_revealed(card, Side::Overlord, true)?;
                state.set_revealed(card, Side::Champion, true)?;
                Ok(Applied::Discarded { card })
            }

            Mutation::DiscardRandomFromHand { side } => {
                let len = state.player(side).zones.hand.len();
                if len == 0 {
                    return Err(EngineError::RuleViolation(format!(
                        "random discard from empty {side} hand"
                    )));
                }
                let index = state.rng.pick_index(len);
                let card = state.player(side).zones.hand.cards[index];
                Mutation::DiscardFromHand { card }.apply(state, registry)
            }

            Mutation::DecideMulligan { side } => {
                state.player_mut(side).mulligan_decided = true;
                Ok(Applied::None)
            }

            Mutation::SetPhase { phase } => {
                state.phase = phase;
                Ok(Applied::None)
            }

            Mutation::SetStatus { status } => {
                state.status = status;
                Ok(Applied::None)
            }

            Mutation::AdvanceTurn { next } => {
                state.turn.end_turn(next);
                Ok(Applied::None)
            }

            Mutation::SetRaid { raid } => {
                state.raid = raid;
                Ok(Applied::None)
            }
        }
    }
}
