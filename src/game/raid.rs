//! Raid combat math
//!
//! A raid walks the target room's defenders in placement order. These
//! helpers compute the numbers each encounter compares; the encounter
//! sequencing itself runs through the resolver stack so that destroys,
//! replacements and triggers interleave correctly.

use crate::core::{CardId, CounterKind, RoomId, Side};
use crate::game::state::GameState;
use crate::registry::{CardKind, CardRegistry, StaticAbility};

/// Minions defending a room, in placement order.
pub fn room_minions(state: &GameState, room: RoomId, registry: &CardRegistry) -> Vec<CardId> {
    state
        .room_cards(room)
        .iter()
        .copied()
        .filter(|&id| {
            state
                .card(id)
                .ok()
                .and_then(|c| registry.lookup(c.def).ok())
                .map(|def| def.kind == CardKind::Minion)
                .unwrap_or(false)
        })
        .collect()
}

/// Schemes present in a room, in placement order.
pub fn room_schemes(state: &GameState, room: RoomId, registry: &CardRegistry) -> Vec<CardId> {
    state
        .room_cards(room)
        .iter()
        .copied()
        .filter(|&id| {
            state
                .card(id)
                .ok()
                .and_then(|c| registry.lookup(c.def).ok())
                .map(|def| def.kind == CardKind::Scheme)
                .unwrap_or(false)
        })
        .collect()
}

/// The scheme a successful access captures: highest progress, with ties
/// going to the most recently placed scheme.
pub fn capture_target(state: &GameState, room: RoomId, registry: &CardRegistry) -> Option<CardId> {
    room_schemes(state, room, registry)
        .into_iter()
        .max_by_key(|&id| {
            state
                .card(id)
                .map(|c| c.get_counters(CounterKind::Progress))
                .unwrap_or(0)
        })
}

/// The Champion's current attack: identity base plus every `AttackBonus`
/// carried by an in-play arena card.
pub fn champion_attack(state: &GameState, registry: &CardRegistry) -> u32 {
    let identity = state.player(Side::Champion).identity;
    let base = registry
        .lookup(identity)
        .ok()
        .and_then(|def| def.stats.attack)
        .unwrap_or(0);

    let bonus: u32 = state
        .player(Side::Champion)
        .zones
        .arena
        .cards
        .iter()
        .filter_map(|&id| state.card(id).ok())
        .filter_map(|c| registry.lookup(c.def).ok())
        .flat_map(|def| def.statics())
        .map(|s| match s {
            StaticAbility::AttackBonus { amount } => *amount,
            _ => 0,
        })
        .sum();

    base + bonus
}

/// A minion's current defense: base stat, plus its shield counters, plus
/// applicable `DefenseBonus` statics from Overlord cards in play (the
/// carrier included).
pub fn minion_defense(state: &GameState, minion: CardId, registry: &CardRegistry) -> u32 {
    let Ok(card) = state.card(minion) else {
        return 0;
    };
    let base = registry
        .lookup(card.def)
        .ok()
        .and_then(|def| def.stats.defense)
        .unwrap_or(0);
    let shields = card.get_counters(CounterKind::Shield);

    let minion_room = match card.location.zone {
        crate::zones::Zone::Room(room) => Some(room),
        _ => None,
    };

    let mut bonus = 0;
    for other in state.cards_in_play() {
        let Ok(other_state) = state.card(other) else {
            continue;
        };
        if other_state.owner != Side::Overlord {
            continue;
        }
        let Ok(def) = registry.lookup(other_state.def) else {
            continue;
        };
        for ability in def.statics() {
            if let StaticAbility::DefenseBonus {
                same_room_only,
                amount,
            } = ability
            {
                let other_room = match other_state.location.zone {
                    crate::zones::Zone::Room(room) => Some(room),
                    _ => None,
                };
                if !same_room_only || (minion_room.is_some() && other_room == minion_room) {
                    bonus += amount;
                }
            }
        }
    }

    base + shields + bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameId, PerSide};
    use crate::registry::sets;
    use crate::zones::{Zone, ZoneAddr};

    fn test_state() -> (GameState, &'static CardRegistry) {
        let state = GameState::new(
            GameId::new(1),
            42,
            PerSide::new(sets::OVERLORD_IDENTITY, sets::CHAMPION_IDENTITY),
        );
        (state, CardRegistry::global())
    }

    #[test]
    fn test_champion_attack_with_weapons() {
        let (mut state, registry) = test_state();
        assert_eq!(champion_attack(&state, registry), 3);

        let arena = ZoneAddr::new(Side::Champion, Zone::Arena);
        state.create_card(sets::EMBERFANG_BLADE, Side::Champion, arena, None);
        assert_eq!(champion_attack(&state, registry), 5);

        state.create_card(sets::EMBERFANG_BLADE, Side::Champion, arena, None);
        assert_eq!(champion_attack(&state, registry), 7);
    }

    #[test]
    fn test_minion_defense_with_shield_counters() {
        let (mut state, registry) = test_state();
        let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(0)));
        let warden = state.create_card(sets::GLOOM_WARDEN, Side::Overlord, room, None);

        assert_eq!(minion_defense(&state, warden, registry), 2);

        state
            .add_counters(warden, CounterKind::Shield, 2)
            .unwrap();
        assert_eq!(minion_defense(&state, warden, registry), 4);
    }

    #[test]
    fn test_same_room_defense_bonus() {
        let (mut state, registry) = test_state();
        let room0 = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(0)));
        let room1 = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(1)));

        let warden = state.create_card(sets::GLOOM_WARDEN, Side::Overlord, room0, None);
        let far_minion = state.create_card(sets::TOMB_SENTINEL, Side::Overlord, room1, None);
        state.create_card(sets::VAULT_BASILISK, Side::Overlord, room0, None);

        // Basilisk buffs its own room only; it also buffs itself.
        assert_eq!(minion_defense(&state, warden, registry), 3);
        assert_eq!(minion_defense(&state, far_minion, registry), 3);
        let basilisk = room_minions(&state, RoomId::new(0), registry)[1];
        assert_eq!(minion_defense(&state, basilisk, registry), 5);
    }

    #[test]
    fn test_capture_target_prefers_progress() {
        let (mut state, registry) = test_state();
        let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(2)));
        let early = state.create_card(sets::GEMCARVING_RITE, Side::Overlord, room, None);
        let advanced = state.create_card(sets::RIFT_SIPHON, Side::Overlord, room, None);
        state
            .add_counters(advanced, CounterKind::Progress, 2)
            .unwrap();

        assert_eq!(capture_target(&state, RoomId::new(2), registry), Some(advanced));

        // Ties favor the most recently placed scheme.
        state
            .add_counters(early, CounterKind::Progress, 2)
            .unwrap();
        assert_eq!(capture_target(&state, RoomId::new(2), registry), Some(advanced));
        state
            .add_counters(early, CounterKind::Progress, 1)
            .unwrap();
        assert_eq!(capture_target(&state, RoomId::new(2), registry), Some(early));
    }

    #[test]
    fn test_room_minions_excludes_schemes() {
        let (mut state, registry) = test_state();
        let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(3)));
        let minion = state.create_card(sets::TOMB_SENTINEL, Side::Overlord, room, None);
        state.create_card(sets::GEMCARVING_RITE, Side::Overlord, room, None);

        assert_eq!(room_minions(&state, RoomId::new(3), registry), vec![minion]);
    }
}
