//! Card instances
//!
//! A `CardState` is one card during gameplay. Many instances can share a
//! definition; everything that changes while the game runs (zone,
//! visibility, counters) lives here, while the unchanging data lives in
//! the registry's `CardDefinition`.

use crate::core::{CardId, DefId, PerSide, Side};
use crate::zones::{Zone, ZoneAddr};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Kinds of counters a card can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterKind {
    /// Scheme advancement toward its scoring threshold.
    Progress,
    /// Room levels applied to a project.
    Level,
    Shield,
}

/// Represents one card in a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardState {
    /// Unique ID for this card instance
    pub id: CardId,

    /// The definition this card instantiates
    pub def: DefId,

    /// Owning side
    pub owner: Side,

    /// The container currently holding this card. The side can differ
    /// from `owner`: a captured scheme sits in the Champion's score zone
    /// while remaining Overlord-owned.
    pub location: ZoneAddr,

    /// Which sides currently see this card's face. Hidden information is
    /// asymmetric: a face-down room card is revealed to the Overlord only.
    pub revealed_to: PerSide<bool>,

    /// Counters on this card
    pub counters: SmallVec<[(CounterKind, u32); 2]>,

    /// Sort key for rendering within its zone. Never a rules input.
    pub position: u32,

    /// Set for ability-granted tokens: the card that created this one.
    pub parent: Option<CardId>,
}

impl CardState {
    pub fn new(id: CardId, def: DefId, owner: Side) -> Self {
        CardState {
            id,
            def,
            owner,
            location: ZoneAddr::new(owner, Zone::Deck),
            revealed_to: PerSide::new(false, false),
            counters: SmallVec::new(),
            position: 0,
            parent: None,
        }
    }

    pub fn is_revealed_to(&self, side: Side) -> bool {
        *self.revealed_to.get(side)
    }

    pub fn is_token(&self) -> bool {
        self.parent.is_some()
    }

    pub fn add_counters(&mut self, kind: CounterKind, amount: u32) {
        if let Some((_, count)) = self.counters.iter_mut().find(|(k, _)| *k == kind) {
            *count += amount;
        } else {
            self.counters.push((kind, amount));
        }
    }

    /// Remove counters; returns false (and leaves the card untouched) if
    /// there are fewer than `amount`.
    pub fn remove_counters(&mut self, kind: CounterKind, amount: u32) -> bool {
        match self.counters.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, count)) if *count >= amount => {
                *count -= amount;
                true
            }
            _ => false,
        }
    }

    pub fn get_counters(&self, kind: CounterKind) -> u32 {
        self.counters
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let card = CardState::new(CardId::new(1), DefId::new(100), Side::Overlord);
        assert_eq!(card.location, ZoneAddr::new(Side::Overlord, Zone::Deck));
        assert!(!card.is_revealed_to(Side::Overlord));
        assert!(!card.is_revealed_to(Side::Champion));
        assert!(!card.is_token());
    }

    #[test]
    fn test_counters() {
        let mut card = CardState::new(CardId::new(1), DefId::new(100), Side::Overlord);

        card.add_counters(CounterKind::Progress, 2);
        card.add_counters(CounterKind::Progress, 1);
        assert_eq!(card.get_counters(CounterKind::Progress), 3);
        assert_eq!(card.get_counters(CounterKind::Shield), 0);

        assert!(card.remove_counters(CounterKind::Progress, 2));
        assert_eq!(card.get_counters(CounterKind::Progress), 1);

        assert!(!card.remove_counters(CounterKind::Progress, 5));
        assert_eq!(card.get_counters(CounterKind::Progress), 1);
    }

    #[test]
    fn test_visibility_flags() {
        let mut card = CardState::new(CardId::new(1), DefId::new(100), Side::Overlord);
        *card.revealed_to.get_mut(Side::Overlord) = true;
        assert!(card.is_revealed_to(Side::Overlord));
        assert!(!card.is_revealed_to(Side::Champion));
    }
}
