//! Ability and effect vocabulary
//!
//! Abilities are a closed tagged variant so the resolver's stack machine
//! can match exhaustively. Effects never mutate state: an `EffectSpec` is
//! a pure description that the resolver evaluates into atomic mutations.

use crate::core::{CounterKind, DefId, ManaKind};
use serde::{Deserialize, Serialize};

/// Who an effect applies to, relative to the ability's source card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    Owner,
    Opponent,
}

/// Which card an effect applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    /// The card carrying the ability.
    This,
    /// The target chosen when the action was submitted (arrow targeting).
    Chosen,
}

/// Pure effect descriptions interpreted by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSpec {
    /// Add mana to a pool
    GainMana {
        who: Recipient,
        kind: ManaKind,
        amount: u32,
    },

    /// Draw cards; draws past an empty deck fizzle
    DrawCards { who: Recipient, count: u32 },

    /// Destroy the chosen target
    DestroyTarget,

    /// Put counters on a card
    AddCounters {
        target: EffectTarget,
        kind: CounterKind,
        count: u32,
    },

    /// Discard random cards from a hand
    DiscardRandom { who: Recipient, count: u32 },

    /// Return a card in play to its owner's hand
    ReturnToHand { target: EffectTarget },

    /// Shuffle a card into its owner's deck
    ShuffleIntoDeck { target: EffectTarget },

    /// Create a token card in the source's room
    CreateToken { def: DefId },

    /// Explicit no-op (used by replacements that simply cancel an outcome)
    Nothing,
}

/// Events a triggered ability can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerCondition {
    /// The card was played from hand
    OnPlay,
    /// The card was destroyed
    OnDestroyed,
    /// The scheme was scored by its owner
    OnScored,
    /// A raid began against the room holding this card
    OnRaidBegin,
}

/// Cost of an activated ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityCost {
    pub action_points: u32,
    pub mana: u32,
}

/// Continuously applied modifiers. These are queried where relevant, never
/// placed on the resolution stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticAbility {
    /// Bonus to defense of minions (the carrier included when in a room)
    DefenseBonus { same_room_only: bool, amount: u32 },
    /// Bonus to the Champion's attack while this card is in the arena
    AttackBonus { amount: u32 },
}

/// Mutations a replacement ability can intercept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacedEvent {
    /// This card would be destroyed
    Destroyed,
    /// This scheme would be captured in a raid
    Captured,
}

/// One ability on a card definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Triggered {
        when: TriggerCondition,
        effect: EffectSpec,
    },
    Activated {
        cost: AbilityCost,
        effect: EffectSpec,
    },
    Static(StaticAbility),
    /// Substitutes `instead` for the intercepted mutation before it commits.
    Replacement {
        replaces: ReplacedEvent,
        instead: EffectSpec,
    },
}
