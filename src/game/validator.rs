//! Action validation
//!
//! `validate` decides legality without mutating anything. Checks run in a
//! fixed order and the first failure wins: (1) the acting player's
//! window is open, (2) no action is pending resolution, (3) declared
//! costs are payable, (4) any chosen target is in the legal-target set.

use crate::core::{CardId, RoomId, Side};
use crate::game::actions::{ActionTarget, StandardPayload, UserAction};
use crate::game::state::GameState;
use crate::game::{GamePhase, GameStatus};
use crate::registry::{Ability, CardKind, CardRegistry, Targeting};
use crate::zones::Zone;
use crate::{EngineError, Result};

pub fn validate(
    state: &GameState,
    side: Side,
    action: &UserAction,
    registry: &CardRegistry,
) -> Result<()> {
    // (1) Action window.
    check_window(state, side, action)?;

    // (2) Single action in flight.
    if state.pending_action {
        return Err(EngineError::ActionPending);
    }

    // (3) Declared costs. A request naming a card that does not exist is
    // a client mistake, not an engine defect.
    let cost = action.cost(state, registry).map_err(|err| match err {
        EngineError::UnknownIdentifier(id) => {
            EngineError::InvalidTarget(format!("card{id} does not exist"))
        }
        other => other,
    })?;
    let player = state.player(side);
    if player.action_points < cost.action_points {
        return Err(EngineError::InsufficientActionPoints {
            needed: cost.action_points,
            available: player.action_points,
        });
    }
    if !player.mana.can_pay(cost.mana, cost.allow_restricted) {
        let available = if cost.allow_restricted {
            player.mana.total()
        } else {
            player.mana.normal
        };
        return Err(EngineError::InsufficientMana {
            needed: cost.mana,
            available,
        });
    }

    // (4) Targets.
    check_target(state, side, action, registry)
}

fn check_window(state: &GameState, side: Side, action: &UserAction) -> Result<()> {
    match state.status {
        GameStatus::Active => {}
        GameStatus::Finished { .. } => return Err(EngineError::GameOver),
        GameStatus::Degraded => {
            return Err(EngineError::RuleViolation(
                "game is degraded and accepts no actions".to_string(),
            ))
        }
    }

    match state.phase {
        GamePhase::Mulligan => match action {
            UserAction::Standard(s)
                if matches!(
                    s.payload,
                    StandardPayload::KeepOpeningHand | StandardPayload::MulliganOpeningHand
                ) =>
            {
                Ok(())
            }
            _ => Err(EngineError::WrongPhase(state.phase.to_string())),
        },
        GamePhase::ActivePlay(active) => {
            if active != side {
                return Err(EngineError::NotYourTurn);
            }
            match action {
                // Mulligan decisions belong to the Mulligan phase only.
                UserAction::Standard(s)
                    if matches!(
                        s.payload,
                        StandardPayload::KeepOpeningHand | StandardPayload::MulliganOpeningHand
                    ) =>
                {
                    Err(EngineError::WrongPhase(state.phase.to_string()))
                }
                // Side-exclusive actions: the wrong side never has this
                // window, even on its own turn.
                UserAction::LevelUpRoom(_) if side != Side::Overlord => {
                    Err(EngineError::NotYourTurn)
                }
                UserAction::InitiateRaid(_) if side != Side::Champion => {
                    Err(EngineError::NotYourTurn)
                }
                _ => Ok(()),
            }
        }
        GamePhase::Setup | GamePhase::RaidResolution | GamePhase::Scoring => {
            Err(EngineError::WrongPhase(state.phase.to_string()))
        }
        GamePhase::GameOver => Err(EngineError::GameOver),
    }
}

fn check_target(
    state: &GameState,
    side: Side,
    action: &UserAction,
    registry: &CardRegistry,
) -> Result<()> {
    match action {
        UserAction::DrawCard => {
            if state.player(side).zones.deck.is_empty() {
                return Err(EngineError::DeckEmpty);
            }
            Ok(())
        }

        UserAction::LevelUpRoom(room) => {
            // Access: the Overlord must already hold the room.
            if state.room_cards(*room).is_empty() {
                return Err(EngineError::InvalidTarget(format!(
                    "no access to {room}"
                )));
            }
            Ok(())
        }

        UserAction::InitiateRaid(room) => {
            if state.room_cards(*room).is_empty() {
                return Err(EngineError::InvalidTarget(format!(
                    "{room} holds nothing to raid"
                )));
            }
            Ok(())
        }

        UserAction::PlayCard { card, target } => {
            let card_state = state
                .card(*card)
                .map_err(|_| EngineError::InvalidTarget(format!("{card} does not exist")))?;
            if card_state.owner != side || card_state.location.zone != Zone::Hand {
                return Err(EngineError::InvalidTarget(format!("{card} is not in your hand")));
            }
            let def = registry.lookup(card_state.def)?;
            if def.side != side {
                return Err(EngineError::InvalidTarget(format!(
                    "{card} cannot be played by the {side}"
                )));
            }
            match (def.targeting, target) {
                (Targeting::None, None) => Ok(()),
                (Targeting::Room, Some(ActionTarget::Room(_))) => Ok(()),
                (Targeting::Arrow, Some(ActionTarget::Card(chosen))) => {
                    if arrow_targets(state, side, registry).contains(chosen) {
                        Ok(())
                    } else {
                        Err(EngineError::InvalidTarget(format!(
                            "{chosen} is not a legal target"
                        )))
                    }
                }
                _ => Err(EngineError::InvalidTarget(
                    "target does not match the card's requirements".to_string(),
                )),
            }
        }

        UserAction::Standard(standard) => match standard.payload {
            StandardPayload::KeepOpeningHand | StandardPayload::MulliganOpeningHand => {
                if state.player(side).mulligan_decided {
                    return Err(EngineError::InvalidTarget(
                        "opening hand already decided".to_string(),
                    ));
                }
                Ok(())
            }
            StandardPayload::ActivateAbility { card, index } => {
                let card_state = state
                    .card(card)
                    .map_err(|_| EngineError::InvalidTarget(format!("{card} does not exist")))?;
                if card_state.owner != side || !card_state.location.zone.is_in_play() {
                    return Err(EngineError::InvalidTarget(format!(
                        "{card} is not in play under your control"
                    )));
                }
                let def = registry.lookup(card_state.def)?;
                match def.abilities.get(index as usize) {
                    Some(Ability::Activated { .. }) => Ok(()),
                    _ => Err(EngineError::InvalidTarget(format!(
                        "{card} has no activated ability at slot {index}"
                    ))),
                }
            }
            StandardPayload::EndTurn => Ok(()),
        },

        UserAction::GainMana | UserAction::SpendActionPoint => Ok(()),
    }
}

/// The legal-target set for arrow targeting: enemy minions in rooms that
/// are revealed to the acting side. Hidden cards cannot be picked out, so
/// face-down defenders are untargetable until a raid exposes them.
pub fn arrow_targets(state: &GameState, side: Side, registry: &CardRegistry) -> Vec<CardId> {
    let mut targets = Vec::new();
    for room in RoomId::all() {
        for &card in state.room_cards(room) {
            let Ok(card_state) = state.card(card) else {
                continue;
            };
            if card_state.owner == side || !card_state.is_revealed_to(side) {
                continue;
            }
            if let Ok(def) = registry.lookup(card_state.def) {
                if def.kind == CardKind::Minion {
                    targets.push(card);
                }
            }
        }
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameId, ManaKind, PerSide};
    use crate::registry::sets;
    use crate::zones::ZoneAddr;

    fn active_state(side: Side) -> GameState {
        let mut state = GameState::new(
            GameId::new(1),
            42,
            PerSide::new(sets::OVERLORD_IDENTITY, sets::CHAMPION_IDENTITY),
        );
        state.phase = GamePhase::ActivePlay(side);
        state.player_mut(side).action_points = 3;
        state
    }

    #[test]
    fn test_not_your_turn() {
        let state = active_state(Side::Overlord);
        let err = validate(
            &state,
            Side::Champion,
            &UserAction::GainMana,
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn);
    }

    #[test]
    fn test_pending_action_rejected() {
        let mut state = active_state(Side::Overlord);
        state.pending_action = true;
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::GainMana,
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::ActionPending);
    }

    #[test]
    fn test_check_order_window_before_costs() {
        // Champion with zero action points on the Overlord's turn: the
        // window failure must win over the cost failure.
        let state = active_state(Side::Overlord);
        let err = validate(
            &state,
            Side::Champion,
            &UserAction::DrawCard,
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn);
    }

    #[test]
    fn test_draw_from_empty_deck_rejected() {
        let state = active_state(Side::Overlord);
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::DrawCard,
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::DeckEmpty);
    }

    #[test]
    fn test_level_up_requires_access() {
        let mut state = active_state(Side::Overlord);
        state
            .player_mut(Side::Overlord)
            .mana
            .gain(ManaKind::Normal, 5);
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::LevelUpRoom(RoomId::new(0)),
            CardRegistry::global(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget(_)));
    }

    #[test]
    fn test_level_up_champion_is_not_your_turn() {
        let state = active_state(Side::Champion);
        let err = validate(
            &state,
            Side::Champion,
            &UserAction::LevelUpRoom(RoomId::new(0)),
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NotYourTurn);
    }

    #[test]
    fn test_insufficient_mana() {
        let mut state = active_state(Side::Overlord);
        let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(0)));
        state.create_card(sets::GEMCARVING_RITE, Side::Overlord, room, None);
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::LevelUpRoom(RoomId::new(0)),
            CardRegistry::global(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientMana { .. }));
    }

    #[test]
    fn test_arrow_targets_exclude_hidden() {
        let mut state = active_state(Side::Champion);
        let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(2)));
        let hidden = state.create_card(sets::TOMB_SENTINEL, Side::Overlord, room, None);
        let revealed = state.create_card(sets::GLOOM_WARDEN, Side::Overlord, room, None);
        state.set_revealed(revealed, Side::Champion, true).unwrap();

        let targets = arrow_targets(&state, Side::Champion, CardRegistry::global());
        assert!(targets.contains(&revealed));
        assert!(!targets.contains(&hidden));
    }

    #[test]
    fn test_mulligan_decision_only_once() {
        let mut state = active_state(Side::Overlord);
        state.phase = GamePhase::Mulligan;
        state.player_mut(Side::Overlord).mulligan_decided = true;
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::keep_hand(),
            CardRegistry::global(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTarget(_)));
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let mut state = active_state(Side::Overlord);
        state.phase = GamePhase::GameOver;
        state.status = GameStatus::Finished {
            winner: Some(Side::Overlord),
        };
        let err = validate(
            &state,
            Side::Overlord,
            &UserAction::GainMana,
            CardRegistry::global(),
        )
        .unwrap_err();
        assert_eq!(err, EngineError::GameOver);
    }
}
