//! Static card definitions
//!
//! A `CardDefinition` holds the unchanging properties of a card: its cost,
//! stats, targeting requirements and abilities. Instance data (zone,
//! counters, visibility) lives in `CardState`.

use crate::core::{DefId, Side};
use crate::registry::{Ability, StaticAbility};
use serde::{Deserialize, Serialize};

/// Card kinds. Minion/Scheme/Project belong to the Overlord,
/// Weapon/Spell/Ally to the Champion, Identity to either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Minion,
    Scheme,
    Project,
    Weapon,
    Spell,
    Ally,
    Identity,
}

/// Targeting requirements consumed by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Targeting {
    /// No target required
    #[default]
    None,
    /// Targets one of the keep's rooms
    Room,
    /// Targets an enemy minion in play (rendered as an arrow)
    Arrow,
}

/// Numeric stats. Which fields are meaningful depends on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardStats {
    /// Minion defense
    pub defense: Option<u32>,
    /// Base attack (Champion identity)
    pub attack: Option<u32>,
    /// Progress counters needed before a scheme scores
    pub scheme_threshold: Option<u32>,
    /// Points awarded when a scheme is scored or captured
    pub scheme_points: Option<u32>,
}

/// Static definition of one card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: DefId,
    pub name: String,
    pub side: Side,
    pub kind: CardKind,
    /// Mana cost to play from hand
    pub cost: u32,
    pub stats: CardStats,
    pub targeting: Targeting,
    pub abilities: Vec<Ability>,
    /// Tokens exist only as children of the card that created them and
    /// never appear in decks.
    pub token: bool,
}

impl CardDefinition {
    pub fn new(id: DefId, name: impl Into<String>, side: Side, kind: CardKind) -> Self {
        CardDefinition {
            id,
            name: name.into(),
            side,
            kind,
            cost: 0,
            stats: CardStats::default(),
            targeting: Targeting::default(),
            abilities: Vec::new(),
            token: false,
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.stats.defense = Some(defense);
        self
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.stats.attack = Some(attack);
        self
    }

    pub fn with_scheme(mut self, threshold: u32, points: u32) -> Self {
        self.stats.scheme_threshold = Some(threshold);
        self.stats.scheme_points = Some(points);
        self
    }

    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = targeting;
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn as_token(mut self) -> Self {
        self.token = true;
        self
    }

    pub fn is_minion(&self) -> bool {
        self.kind == CardKind::Minion
    }

    pub fn is_scheme(&self) -> bool {
        self.kind == CardKind::Scheme
    }

    /// Overlord cards are placed face-down into rooms; Champion cards are
    /// played face-up.
    pub fn plays_face_down(&self) -> bool {
        self.side == Side::Overlord
    }

    /// Iterate static abilities only.
    pub fn statics(&self) -> impl Iterator<Item = &StaticAbility> + '_ {
        self.abilities.iter().filter_map(|a| match a {
            Ability::Static(s) => Some(s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{EffectSpec, Recipient, TriggerCondition};
    use crate::core::ManaKind;

    #[test]
    fn test_definition_builder() {
        let def = CardDefinition::new(DefId::new(1), "Tomb Sentinel", Side::Overlord, CardKind::Minion)
            .with_cost(2)
            .with_defense(3);

        assert_eq!(def.name, "Tomb Sentinel");
        assert_eq!(def.cost, 2);
        assert_eq!(def.stats.defense, Some(3));
        assert!(def.is_minion());
        assert!(def.plays_face_down());
    }

    #[test]
    fn test_statics_iterator() {
        let def = CardDefinition::new(DefId::new(2), "Test", Side::Overlord, CardKind::Minion)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Normal,
                    amount: 1,
                },
            })
            .with_ability(Ability::Static(StaticAbility::DefenseBonus {
                same_room_only: true,
                amount: 1,
            }));

        assert_eq!(def.statics().count(), 1);
    }
}
