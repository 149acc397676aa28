//! The built-in base set
//!
//! Definition IDs are stable: identities in the single digits, Overlord
//! cards in the 10s and 20s, Champion cards in the 30s. Decks reference
//! these IDs directly.

use crate::core::{CounterKind, DefId, ManaKind, Side};
use crate::registry::{
    Ability, AbilityCost, CardDefinition, CardKind, EffectSpec, EffectTarget, Recipient,
    ReplacedEvent, StaticAbility, Targeting, TriggerCondition,
};

pub const OVERLORD_IDENTITY: DefId = DefId::new(1);
pub const CHAMPION_IDENTITY: DefId = DefId::new(2);

pub const TOMB_SENTINEL: DefId = DefId::new(10);
pub const GLOOM_WARDEN: DefId = DefId::new(11);
pub const BONE_ARCHIVIST: DefId = DefId::new(12);
pub const VAULT_BASILISK: DefId = DefId::new(13);
pub const CRYPT_MOTHER: DefId = DefId::new(14);
pub const HUSK_TOKEN: DefId = DefId::new(15);
pub const REVENANT_THRALL: DefId = DefId::new(16);
pub const GEMCARVING_RITE: DefId = DefId::new(17);
pub const RIFT_SIPHON: DefId = DefId::new(18);
pub const MIRRORGLASS_LEDGER: DefId = DefId::new(19);
pub const MANA_FORGE: DefId = DefId::new(20);
pub const ALARM_GARGOYLE: DefId = DefId::new(21);

pub const EMBERFANG_BLADE: DefId = DefId::new(30);
pub const LANTERN_BEARER: DefId = DefId::new(31);
pub const SCRYING_BOLT: DefId = DefId::new(32);
pub const COLLAPSE_TUNNEL: DefId = DefId::new(33);
pub const GRAVE_WHISPER: DefId = DefId::new(34);

/// All definitions in the base set.
pub fn base_set() -> Vec<CardDefinition> {
    vec![
        CardDefinition::new(
            OVERLORD_IDENTITY,
            "Wardens of the Sunken Keep",
            Side::Overlord,
            CardKind::Identity,
        ),
        CardDefinition::new(
            CHAMPION_IDENTITY,
            "Seeker of the Rift",
            Side::Champion,
            CardKind::Identity,
        )
        .with_attack(3),
        // --- Overlord minions ---
        CardDefinition::new(TOMB_SENTINEL, "Tomb Sentinel", Side::Overlord, CardKind::Minion)
            .with_cost(2)
            .with_targeting(Targeting::Room)
            .with_defense(3),
        CardDefinition::new(GLOOM_WARDEN, "Gloom Warden", Side::Overlord, CardKind::Minion)
            .with_cost(1)
            .with_targeting(Targeting::Room)
            .with_defense(2)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnDestroyed,
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Normal,
                    amount: 1,
                },
            }),
        CardDefinition::new(BONE_ARCHIVIST, "Bone Archivist", Side::Overlord, CardKind::Minion)
            .with_cost(2)
            .with_targeting(Targeting::Room)
            .with_defense(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::DrawCards {
                    who: Recipient::Owner,
                    count: 1,
                },
            }),
        CardDefinition::new(VAULT_BASILISK, "Vault Basilisk", Side::Overlord, CardKind::Minion)
            .with_cost(4)
            .with_targeting(Targeting::Room)
            .with_defense(4)
            .with_ability(Ability::Static(StaticAbility::DefenseBonus {
                same_room_only: true,
                amount: 1,
            })),
        CardDefinition::new(CRYPT_MOTHER, "Crypt Mother", Side::Overlord, CardKind::Minion)
            .with_cost(3)
            .with_targeting(Targeting::Room)
            .with_defense(2)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnDestroyed,
                effect: EffectSpec::CreateToken { def: HUSK_TOKEN },
            }),
        CardDefinition::new(HUSK_TOKEN, "Husk", Side::Overlord, CardKind::Minion)
            .with_defense(1)
            .as_token(),
        CardDefinition::new(REVENANT_THRALL, "Revenant Thrall", Side::Overlord, CardKind::Minion)
            .with_cost(3)
            .with_targeting(Targeting::Room)
            .with_defense(3)
            .with_ability(Ability::Replacement {
                replaces: ReplacedEvent::Destroyed,
                instead: EffectSpec::ReturnToHand {
                    target: EffectTarget::This,
                },
            }),
        CardDefinition::new(ALARM_GARGOYLE, "Alarm Gargoyle", Side::Overlord, CardKind::Minion)
            .with_cost(2)
            .with_targeting(Targeting::Room)
            .with_defense(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnRaidBegin,
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Normal,
                    amount: 1,
                },
            }),
        // --- Overlord schemes and projects ---
        CardDefinition::new(GEMCARVING_RITE, "Gemcarving Rite", Side::Overlord, CardKind::Scheme)
            .with_targeting(Targeting::Room)
            .with_scheme(3, 2),
        CardDefinition::new(RIFT_SIPHON, "Rift Siphon", Side::Overlord, CardKind::Scheme)
            .with_targeting(Targeting::Room)
            .with_scheme(4, 3)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnScored,
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Restricted,
                    amount: 2,
                },
            }),
        CardDefinition::new(
            MIRRORGLASS_LEDGER,
            "Mirrorglass Ledger",
            Side::Overlord,
            CardKind::Scheme,
        )
        .with_targeting(Targeting::Room)
        .with_scheme(3, 2)
        .with_ability(Ability::Replacement {
            replaces: ReplacedEvent::Captured,
            instead: EffectSpec::ShuffleIntoDeck {
                target: EffectTarget::This,
            },
        }),
        CardDefinition::new(MANA_FORGE, "Mana Forge", Side::Overlord, CardKind::Project)
            .with_cost(1)
            .with_targeting(Targeting::Room)
            .with_ability(Ability::Activated {
                cost: AbilityCost {
                    action_points: 1,
                    mana: 0,
                },
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Restricted,
                    amount: 2,
                },
            }),
        // --- Champion cards ---
        CardDefinition::new(EMBERFANG_BLADE, "Emberfang Blade", Side::Champion, CardKind::Weapon)
            .with_cost(2)
            .with_ability(Ability::Static(StaticAbility::AttackBonus { amount: 2 })),
        CardDefinition::new(LANTERN_BEARER, "Lantern Bearer", Side::Champion, CardKind::Ally)
            .with_cost(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::GainMana {
                    who: Recipient::Owner,
                    kind: ManaKind::Restricted,
                    amount: 1,
                },
            }),
        CardDefinition::new(SCRYING_BOLT, "Scrying Bolt", Side::Champion, CardKind::Spell)
            .with_cost(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::DrawCards {
                    who: Recipient::Owner,
                    count: 2,
                },
            }),
        CardDefinition::new(COLLAPSE_TUNNEL, "Collapse Tunnel", Side::Champion, CardKind::Spell)
            .with_cost(2)
            .with_targeting(Targeting::Arrow)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::DestroyTarget,
            }),
        CardDefinition::new(GRAVE_WHISPER, "Grave Whisper", Side::Champion, CardKind::Spell)
            .with_cost(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnPlay,
                effect: EffectSpec::DiscardRandom {
                    who: Recipient::Opponent,
                    count: 1,
                },
            }),
        // Shield counters come from room hardening during long games; keep a
        // counter consumer in the set so the kind is exercised.
        CardDefinition::new(DefId::new(22), "Bulwark Rites", Side::Overlord, CardKind::Project)
            .with_cost(2)
            .with_targeting(Targeting::Room)
            .with_ability(Ability::Activated {
                cost: AbilityCost {
                    action_points: 1,
                    mana: 1,
                },
                effect: EffectSpec::AddCounters {
                    target: EffectTarget::This,
                    kind: CounterKind::Shield,
                    count: 1,
                },
            }),
    ]
}

/// Default Overlord deck for simulations and tests.
pub fn default_overlord_deck() -> Vec<DefId> {
    vec![
        TOMB_SENTINEL,
        GLOOM_WARDEN,
        GLOOM_WARDEN,
        BONE_ARCHIVIST,
        VAULT_BASILISK,
        CRYPT_MOTHER,
        REVENANT_THRALL,
        ALARM_GARGOYLE,
        GEMCARVING_RITE,
        GEMCARVING_RITE,
        RIFT_SIPHON,
        MIRRORGLASS_LEDGER,
        MANA_FORGE,
        TOMB_SENTINEL,
        BONE_ARCHIVIST,
    ]
}

/// Default Champion deck for simulations and tests.
pub fn default_champion_deck() -> Vec<DefId> {
    vec![
        EMBERFANG_BLADE,
        LANTERN_BEARER,
        LANTERN_BEARER,
        SCRYING_BOLT,
        SCRYING_BOLT,
        COLLAPSE_TUNNEL,
        COLLAPSE_TUNNEL,
        GRAVE_WHISPER,
        EMBERFANG_BLADE,
        LANTERN_BEARER,
        SCRYING_BOLT,
        GRAVE_WHISPER,
        COLLAPSE_TUNNEL,
        EMBERFANG_BLADE,
        GRAVE_WHISPER,
    ]
}
