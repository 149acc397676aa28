//! Engine property tests: single-flight, cost safety, deck-out
//! contract, and the trigger-depth guard.

use spellkeep::{
    core::{DefId, GameId, ManaKind, PerSide, RoomId, Side},
    game::{
        actions::UserAction, apply_action, resolver::resolve_action, GameConfig, GamePhase,
        GameSessions, GameState, GameStatus,
    },
    registry::{
        sets, Ability, CardDefinition, CardKind, CardRegistry, EffectSpec, Targeting,
        TriggerCondition,
    },
    zones::{Zone, ZoneAddr},
    EngineError,
};
use std::sync::Arc;

fn sessions_in_active_play() -> (GameSessions, GameId) {
    let sessions = GameSessions::new();
    let game = sessions.create_game(GameConfig::with_seed(21)).unwrap();
    sessions
        .submit_action(game, Side::Overlord, UserAction::keep_hand())
        .unwrap();
    sessions
        .submit_action(game, Side::Champion, UserAction::keep_hand())
        .unwrap();
    (sessions, game)
}

#[test]
fn test_action_pending_rejected() {
    let (sessions, game) = sessions_in_active_play();
    let mut state = sessions.state_snapshot(game).unwrap();

    // Simulate an in-flight action on a copy of the state.
    state.pending_action = true;
    let err = apply_action(&state, Side::Overlord, &UserAction::GainMana).unwrap_err();
    assert_eq!(err, EngineError::ActionPending);
}

#[test]
fn test_concurrent_same_game_submissions_serialize() {
    let (sessions, game) = sessions_in_active_play();
    let sessions = Arc::new(sessions);

    // The Overlord starts its turn with 3 action points; three parallel
    // GainMana submissions must all serialize through the per-game lock.
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let sessions = Arc::clone(&sessions);
            std::thread::spawn(move || {
                sessions.submit_action(game, Side::Overlord, UserAction::GainMana)
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join())
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(successes, 3);

    let state = sessions.state_snapshot(game).unwrap();
    assert_eq!(state.player(Side::Overlord).action_points, 0);
    assert_eq!(state.player(Side::Overlord).mana.normal, 3);
    state.check_zone_partition().unwrap();
}

#[test]
fn test_insufficient_mana_rejected_without_mutation() {
    let (sessions, game) = sessions_in_active_play();
    let registry = CardRegistry::global();
    let before = sessions.state_snapshot(game).unwrap();

    // Pick a hand card the empty mana pool cannot cover.
    let costly = before
        .player(Side::Overlord)
        .zones
        .hand
        .cards
        .iter()
        .copied()
        .find(|&card| {
            before
                .card(card)
                .ok()
                .and_then(|c| registry.lookup(c.def).ok())
                .map(|def| def.cost > 0)
                .unwrap_or(false)
        });
    let Some(card) = costly else {
        return; // all-scheme hand; nothing to underpay
    };

    let action = UserAction::PlayCard {
        card,
        target: Some(spellkeep::game::ActionTarget::Room(RoomId::new(0))),
    };
    let err = sessions
        .submit_action(game, Side::Overlord, action)
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientMana { .. }));

    let after = sessions.state_snapshot(game).unwrap();
    assert_eq!(
        serde_json::to_string(&before).unwrap(),
        serde_json::to_string(&after).unwrap(),
        "rejected action mutated state"
    );
}

#[test]
fn test_draw_from_empty_deck_is_validation_error() {
    // Five-card decks are fully drawn as the opening hand.
    let sessions = GameSessions::new();
    let mut config = GameConfig::with_seed(5);
    config.decks = PerSide::new(
        vec![sets::TOMB_SENTINEL; 5],
        vec![sets::SCRYING_BOLT; 5],
    );
    let game = sessions.create_game(config).unwrap();
    sessions
        .submit_action(game, Side::Overlord, UserAction::keep_hand())
        .unwrap();
    sessions
        .submit_action(game, Side::Champion, UserAction::keep_hand())
        .unwrap();

    let state = sessions.state_snapshot(game).unwrap();
    assert_eq!(state.phase, GamePhase::ActivePlay(Side::Overlord));
    // The automatic start-of-turn draw fizzled on the empty deck.
    assert_eq!(state.player(Side::Overlord).zones.hand.len(), 5);

    let before = serde_json::to_string(&state).unwrap();
    let err = sessions
        .submit_action(game, Side::Overlord, UserAction::DrawCard)
        .unwrap_err();
    assert_eq!(err, EngineError::DeckEmpty);
    assert!(err.is_validation());

    let after = sessions.state_snapshot(game).unwrap();
    assert_eq!(before, serde_json::to_string(&after).unwrap());
}

#[test]
fn test_level_up_inaccessible_room_rejected() {
    let (sessions, game) = sessions_in_active_play();
    // Give the Overlord mana so the cost check passes and the target
    // check is what fires.
    for _ in 0..2 {
        sessions
            .submit_action(game, Side::Overlord, UserAction::GainMana)
            .unwrap();
    }
    let err = sessions
        .submit_action(game, Side::Overlord, UserAction::LevelUpRoom(RoomId::new(4)))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTarget(_)));
}

/// A minion that rebuilds itself every time it dies. Raiding its room
/// destroys it, its trigger recreates it, and the raid fights the copy,
/// forever - exactly what the resolution depth guard exists to stop.
fn looping_registry() -> CardRegistry {
    let hydra = DefId::new(100);
    let mut defs = sets::base_set();
    defs.push(
        CardDefinition::new(hydra, "Hydra Spawn", Side::Overlord, CardKind::Minion)
            .with_cost(1)
            .with_targeting(Targeting::Room)
            .with_defense(1)
            .with_ability(Ability::Triggered {
                when: TriggerCondition::OnDestroyed,
                effect: EffectSpec::CreateToken { def: hydra },
            })
            .as_token(),
    );
    CardRegistry::new(defs).unwrap()
}

#[test]
fn test_stack_overflow_guard_rolls_back() {
    let registry = looping_registry();
    let hydra = DefId::new(100);

    let mut state = GameState::new(
        GameId::new(1),
        42,
        PerSide::new(sets::OVERLORD_IDENTITY, sets::CHAMPION_IDENTITY),
    );
    let room = ZoneAddr::new(Side::Overlord, Zone::Room(RoomId::new(0)));
    state.create_card(hydra, Side::Overlord, room, None);
    state.phase = GamePhase::ActivePlay(Side::Champion);
    let champion = state.player_mut(Side::Champion);
    champion.action_points = 3;
    champion.mana.gain(ManaKind::Normal, 5);

    let before = serde_json::to_string(&state).unwrap();
    let err = resolve_action(
        &mut state,
        Side::Champion,
        &UserAction::InitiateRaid(RoomId::new(0)),
        &registry,
    )
    .unwrap_err();

    assert!(matches!(err, EngineError::StackOverflowGuard(_)));
    // Full rollback to the pre-action snapshot, lock released.
    assert_eq!(before, serde_json::to_string(&state).unwrap());
    assert!(!state.pending_action);
    assert_eq!(state.status, GameStatus::Active);
}

#[test]
fn test_game_over_is_terminal() {
    let (sessions, game) = sessions_in_active_play();
    {
        // Force a finished game through the normal double-pass path.
        sessions
            .submit_action(game, Side::Overlord, UserAction::end_turn())
            .unwrap();
        sessions
            .submit_action(game, Side::Champion, UserAction::end_turn())
            .unwrap();
    }
    let state = sessions.state_snapshot(game).unwrap();
    assert_eq!(state.phase, GamePhase::GameOver);
    assert!(matches!(state.status, GameStatus::Finished { .. }));

    let err = sessions
        .submit_action(game, Side::Overlord, UserAction::GainMana)
        .unwrap_err();
    assert_eq!(err, EngineError::GameOver);
}
