//! Effect resolution
//!
//! The rules-interpreter core. An action seeds a resolution stack with
//! its direct effects; each popped effect is evaluated against *current*
//! state into atomic mutations, which commit immediately (so later
//! effects observe them), may be intercepted by replacement abilities
//! before committing, and may raise new triggers that push back onto the
//! stack. Most-recently-raised triggers resolve first, with the active
//! player's triggers ahead of the opponent's on simultaneous raises.
//!
//! An effect whose precondition no longer holds when popped fizzles
//! silently: zero mutations, zero new triggers. Total resolved effects
//! per action are capped; blowing the cap aborts the action and rolls
//! state back to the pre-action snapshot.

use crate::commands::{Command, CommandEmitter, CommandList, FxKind, MessageKind, MusicState};
use crate::core::{
    AbilityId, CardId, CounterKind, PerSide, RoomId, Side, ACTIONS_PER_TURN, OPENING_HAND_SIZE,
};
use crate::game::actions::{ActionTarget, StandardPayload, UserAction};
use crate::game::mutation::{Applied, Mutation};
use crate::game::raid;
use crate::game::state::{GameState, RaidState};
use crate::game::{GamePhase, GameStatus, POINTS_TO_WIN};
use crate::registry::{
    Ability, CardKind, CardRegistry, EffectSpec, EffectTarget, Recipient, ReplacedEvent,
    TriggerCondition,
};
use crate::zones::{Zone, ZoneAddr};
use crate::{EngineError, Result};

/// Cap on effects resolved per action. A legitimate cascade stays far
/// below this; hitting it means a runaway loop.
pub const MAX_RESOLUTION_DEPTH: usize = 128;

/// Engine-driven effects that share the resolution stack with card
/// abilities so their mutations emit commands and cascade identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SystemEffect {
    StartTurn { side: Side },
    FinishMulligan,
    EndTurn { side: Side },
    BeginRaid { room: RoomId },
    RaidEncounter { room: RoomId },
    RaidAccess { room: RoomId },
    ScoreScheme { card: CardId },
    CheckVictory,
    ResolveScoring,
}

/// One entry on the resolution stack.
#[derive(Debug, Clone)]
enum PendingEffect {
    Ability {
        /// Which definition slot queued this effect
        ability: AbilityId,
        source: CardId,
        spec: EffectSpec,
        /// Container the source occupied when queued; moving fizzles it
        expected: ZoneAddr,
        /// Room context captured at queue time (token placement)
        room: Option<RoomId>,
        /// Action target, for effects that consume one
        chosen: Option<CardId>,
        owner: Side,
    },
    System(SystemEffect),
}

impl PendingEffect {
    fn owner(&self, active: Side) -> Side {
        match self {
            PendingEffect::Ability { owner, .. } => *owner,
            PendingEffect::System(_) => active,
        }
    }
}

struct Resolver<'a> {
    state: &'a mut GameState,
    registry: &'a CardRegistry,
    emitter: CommandEmitter,
    stack: Vec<PendingEffect>,
    resolved: usize,
}

/// Resolve one validated action. On success the state is advanced and
/// both per-recipient command lists are returned. A depth blowout rolls
/// the state back to the pre-action snapshot; any other mid-resolution
/// failure marks the game degraded.
pub fn resolve_action(
    state: &mut GameState,
    side: Side,
    action: &UserAction,
    registry: &CardRegistry,
) -> Result<PerSide<CommandList>> {
    let snapshot = state.clone();
    state.pending_action = true;

    let mut resolver = Resolver {
        state,
        registry,
        emitter: CommandEmitter::new(),
        stack: Vec::new(),
        resolved: 0,
    };

    let result = resolver.run(side, action);
    let Resolver { emitter, state, .. } = resolver;
    match result {
        Ok(()) => {
            if action.counts_as_turn_action() {
                state.turn.record_action();
            }
            state.pending_action = false;
            Ok(emitter.finish(state))
        }
        Err(err @ EngineError::StackOverflowGuard(_)) => {
            log::error!("{}: resolution depth exceeded, rolling back", state.id);
            *state = snapshot;
            Err(err)
        }
        Err(err) => {
            log::error!("{}: rule violation during resolution: {err}", state.id);
            state.status = GameStatus::Degraded;
            state.pending_action = false;
            Err(err)
        }
    }
}

impl<'a> Resolver<'a> {
    fn run(&mut self, side: Side, action: &UserAction) -> Result<()> {
        let (mutations, followups) = self.action_effects(side, action)?;
        self.commit_pass(mutations, followups)?;

        while let Some(pending) = self.stack.pop() {
            self.resolved += 1;
            if self.resolved > MAX_RESOLUTION_DEPTH {
                return Err(EngineError::StackOverflowGuard(MAX_RESOLUTION_DEPTH));
            }
            if !self.precondition_holds(&pending) {
                match &pending {
                    PendingEffect::Ability { ability, source, .. } => {
                        log::debug!("{}: ability {ability} on {source} fizzled", self.state.id)
                    }
                    PendingEffect::System(system) => {
                        log::debug!("{}: system effect fizzled: {system:?}", self.state.id)
                    }
                }
                continue;
            }
            let (mutations, followups) = self.evaluate(&pending)?;
            self.commit_pass(mutations, followups)?;
        }
        Ok(())
    }

    /// Commit one pass worth of mutations, close the command group and
    /// push this pass's follow-ups plus commit-raised triggers.
    fn commit_pass(
        &mut self,
        mutations: Vec<Mutation>,
        followups: Vec<PendingEffect>,
    ) -> Result<()> {
        let mut raised = Vec::new();
        for mutation in mutations {
            self.commit_one(mutation, &mut raised)?;
        }
        self.emitter.end_group();
        self.push_batch(followups, raised);
        Ok(())
    }

    /// Stage a mutation: offer it to replacement abilities, then commit.
    fn commit_one(&mut self, mutation: Mutation, raised: &mut Vec<PendingEffect>) -> Result<()> {
        if let Some(substitute) = self.replacement_for(&mutation)? {
            log::debug!("{}: replacement intercepts {mutation:?}", self.state.id);
            // Substituted mutations commit without re-interception, so a
            // replacement can never intercept its own output.
            for sub in substitute {
                self.commit_direct(sub, raised)?;
            }
            return Ok(());
        }
        self.commit_direct(mutation, raised)
    }

    fn commit_direct(&mut self, mutation: Mutation, raised: &mut Vec<PendingEffect>) -> Result<()> {
        // Context that only exists before the commit.
        let destroyed_room = match mutation {
            Mutation::DestroyCard { card } => match self.state.card(card)?.location.zone {
                Zone::Room(room) => Some(room),
                _ => None,
            },
            _ => None,
        };

        let applied = mutation.apply(self.state, self.registry)?;
        self.emitter
            .emit(self.state, self.registry, &mutation, &applied);
        self.detect_triggers(&mutation, &applied, destroyed_room, raised)?;
        Ok(())
    }

    /// Find a replacement ability intercepting this mutation, and
    /// evaluate its substitute mutation list.
    fn replacement_for(&mut self, mutation: &Mutation) -> Result<Option<Vec<Mutation>>> {
        let (card, event) = match *mutation {
            Mutation::DestroyCard { card } => (card, ReplacedEvent::Destroyed),
            Mutation::CaptureScheme { card } => (card, ReplacedEvent::Captured),
            _ => return Ok(None),
        };
        let card_state = self.state.card(card)?;
        if !card_state.location.zone.is_in_play() {
            return Ok(None);
        }
        let owner = card_state.owner;
        let room = match card_state.location.zone {
            Zone::Room(room) => Some(room),
            _ => None,
        };
        let def = self.registry.lookup(card_state.def)?;
        for ability in &def.abilities {
            if let Ability::Replacement { replaces, instead } = ability {
                if *replaces == event {
                    let muts = self.eval_spec(card, owner, instead, room, None)?;
                    return Ok(Some(muts));
                }
            }
        }
        Ok(None)
    }

    /// Push triggers raised by a committed mutation.
    fn detect_triggers(
        &mut self,
        mutation: &Mutation,
        applied: &Applied,
        destroyed_room: Option<RoomId>,
        raised: &mut Vec<PendingEffect>,
    ) -> Result<()> {
        match *mutation {
            Mutation::DestroyCard { card } => {
                self.emitter.push_both(Command::PlayEffect {
                    kind: FxKind::Destroy,
                    target: Some(card),
                });
                self.queue_triggered(card, TriggerCondition::OnDestroyed, destroyed_room, raised)?;
            }

            Mutation::AddCounters {
                card,
                kind: CounterKind::Progress,
                ..
            } => {
                // A scheme crossing its threshold queues its scoring.
                let card_state = self.state.card(card)?;
                if let Zone::Room(_) = card_state.location.zone {
                    let def = self.registry.lookup(card_state.def)?;
                    if def.kind == CardKind::Scheme {
                        if let Some(threshold) = def.stats.scheme_threshold {
                            if card_state.get_counters(CounterKind::Progress) >= threshold {
                                raised.push(PendingEffect::System(SystemEffect::ScoreScheme {
                                    card,
                                }));
                            }
                        }
                    }
                }
            }

            Mutation::ScoreScheme { card } => {
                self.queue_triggered(card, TriggerCondition::OnScored, None, raised)?;
                raised.push(PendingEffect::System(SystemEffect::CheckVictory));
            }

            Mutation::CaptureScheme { .. } => {
                if let Applied::Scored { .. } = applied {
                    raised.push(PendingEffect::System(SystemEffect::CheckVictory));
                }
            }

            _ => {}
        }
        Ok(())
    }

    /// Queue a card's triggered abilities matching `when`.
    fn queue_triggered(
        &self,
        card: CardId,
        when: TriggerCondition,
        room: Option<RoomId>,
        raised: &mut Vec<PendingEffect>,
    ) -> Result<()> {
        let card_state = self.state.card(card)?;
        let expected = card_state.location;
        let owner = card_state.owner;
        let def = self.registry.lookup(card_state.def)?;
        for (index, ability) in def.abilities.iter().enumerate() {
            if let Ability::Triggered { when: cond, effect } = ability {
                if *cond == when {
                    raised.push(PendingEffect::Ability {
                        ability: AbilityId::new(def.id, index as u8),
                        source: card,
                        spec: effect.clone(),
                        expected,
                        room,
                        chosen: None,
                        owner,
                    });
                }
            }
        }
        Ok(())
    }

    /// Push follow-ups and raised triggers. Pops are LIFO: raised
    /// triggers resolve before follow-ups, and within a raised batch the
    /// active player's triggers resolve before the opponent's.
    fn push_batch(&mut self, followups: Vec<PendingEffect>, mut raised: Vec<PendingEffect>) {
        let active = self.state.turn.active_side;
        for effect in followups.into_iter().rev() {
            self.stack.push(effect);
        }
        raised.sort_by_key(|e| e.owner(active) != active);
        for effect in raised.into_iter().rev() {
            self.stack.push(effect);
        }
    }

    /// Re-check a pending effect against current state. Stale effects
    /// fizzle rather than erroring.
    fn precondition_holds(&self, pending: &PendingEffect) -> bool {
        match pending {
            PendingEffect::Ability {
                source,
                expected,
                spec,
                chosen,
                ..
            } => {
                let Ok(card) = self.state.card(*source) else {
                    return false;
                };
                if card.location != *expected {
                    return false;
                }
                if matches!(spec, EffectSpec::DestroyTarget) {
                    let Some(target) = chosen else { return false };
                    let Ok(target_state) = self.state.card(*target) else {
                        return false;
                    };
                    if !target_state.location.zone.is_in_play() {
                        return false;
                    }
                }
                true
            }
            PendingEffect::System(system) => match *system {
                SystemEffect::ScoreScheme { card } => {
                    let Ok(card_state) = self.state.card(card) else {
                        return false;
                    };
                    matches!(card_state.location.zone, Zone::Room(_))
                }
                SystemEffect::RaidEncounter { room } | SystemEffect::RaidAccess { room } => {
                    matches!(self.state.raid, Some(r) if r.room == room)
                }
                _ => true,
            },
        }
    }

    /// Evaluate a pending effect into mutations plus follow-ups. Pure
    /// with respect to game state: mutations are described, not applied.
    fn evaluate(
        &mut self,
        pending: &PendingEffect,
    ) -> Result<(Vec<Mutation>, Vec<PendingEffect>)> {
        match pending {
            PendingEffect::Ability {
                source,
                spec,
                room,
                chosen,
                owner,
                ..
            } => {
                let muts = self.eval_spec(*source, *owner, spec, *room, *chosen)?;
                Ok((muts, Vec::new()))
            }
            PendingEffect::System(system) => self.eval_system(*system),
        }
    }

    /// Evaluate one effect spec into mutations.
    fn eval_spec(
        &mut self,
        source: CardId,
        owner: Side,
        spec: &EffectSpec,
        room: Option<RoomId>,
        chosen: Option<CardId>,
    ) -> Result<Vec<Mutation>> {
        let recipient = |who: Recipient| match who {
            Recipient::Owner => owner,
            Recipient::Opponent => owner.opponent(),
        };
        let target_card = |target: EffectTarget| match target {
            EffectTarget::This => Some(source),
            EffectTarget::Chosen => chosen,
        };

        Ok(match *spec {
            EffectSpec::GainMana { who, kind, amount } => vec![Mutation::AdjustMana {
                side: recipient(who),
                kind,
                delta: amount as i64,
            }],

            EffectSpec::DrawCards { who, count } => {
                let side = recipient(who);
                // Effect-driven draws past an empty deck fizzle.
                let available = self.state.player(side).zones.deck.len();
                (0..(count as usize).min(available))
                    .map(|_| Mutation::DrawFromDeck { side })
                    .collect()
            }

            EffectSpec::DestroyTarget => match chosen {
                Some(target) => vec![Mutation::DestroyCard { card: target }],
                None => Vec::new(),
            },

            EffectSpec::AddCounters {
                target,
                kind,
                count,
            } => match target_card(target) {
                Some(card) => vec![Mutation::AddCounters { card, kind, count }],
                None => Vec::new(),
            },

            EffectSpec::DiscardRandom { who, count } => {
                let side = recipient(who);
                let available = self.state.player(side).zones.hand.len();
                (0..(count as usize).min(available))
                    .map(|_| Mutation::DiscardRandomFromHand { side })
                    .collect()
            }

            EffectSpec::ReturnToHand { target } => match target_card(target) {
                Some(card) => {
                    let card_state = self.state.card(card)?;
                    let card_owner = card_state.owner;
                    vec![
                        Mutation::MoveCard {
                            card,
                            from: card_state.location,
                            to: ZoneAddr::new(card_owner, Zone::Hand),
                        },
                        Mutation::SetRevealed {
                            card,
                            side: card_owner,
                            revealed: true,
                        },
                        Mutation::SetRevealed {
                            card,
                            side: card_owner.opponent(),
                            revealed: false,
                        },
                    ]
                }
                None => Vec::new(),
            },

            EffectSpec::ShuffleIntoDeck { target } => match target_card(target) {
                Some(card) => {
                    let card_state = self.state.card(card)?;
                    let card_owner = card_state.owner;
                    vec![
                        Mutation::MoveCard {
                            card,
                            from: card_state.location,
                            to: ZoneAddr::new(card_owner, Zone::Deck),
                        },
                        Mutation::SetRevealed {
                            card,
                            side: Side::Overlord,
                            revealed: false,
                        },
                        Mutation::SetRevealed {
                            card,
                            side: Side::Champion,
                            revealed: false,
                        },
                        Mutation::ShuffleDeck { side: card_owner },
                    ]
                }
                None => Vec::new(),
            },

            EffectSpec::CreateToken { def } => match room {
                Some(room) => vec![Mutation::CreateToken {
                    def,
                    owner,
                    location: ZoneAddr::new(owner, Zone::Room(room)),
                    parent: source,
                }],
                // No room context to place into: the token fizzles.
                None => Vec::new(),
            },

            EffectSpec::Nothing => Vec::new(),
        })
    }

    /// Evaluate a system effect.
    fn eval_system(
        &mut self,
        system: SystemEffect,
    ) -> Result<(Vec<Mutation>, Vec<PendingEffect>)> {
        match system {
            SystemEffect::StartTurn { side } => {
                let mut muts = vec![Mutation::SetActionPoints {
                    side,
                    value: ACTIONS_PER_TURN,
                }];
                // The automatic draw fizzles harmlessly on an empty deck.
                if !self.state.player(side).zones.deck.is_empty() {
                    muts.push(Mutation::DrawFromDeck { side });
                }
                Ok((muts, Vec::new()))
            }

            SystemEffect::FinishMulligan => {
                let both_decided = self.state.player(Side::Overlord).mulligan_decided
                    && self.state.player(Side::Champion).mulligan_decided;
                if !both_decided {
                    return Ok((Vec::new(), Vec::new()));
                }
                Ok((
                    vec![Mutation::SetPhase {
                        phase: GamePhase::ActivePlay(Side::Overlord),
                    }],
                    vec![PendingEffect::System(SystemEffect::StartTurn {
                        side: Side::Overlord,
                    })],
                ))
            }

            SystemEffect::EndTurn { side } => {
                let next = side.opponent();
                let is_pass = self.state.turn.actions_taken_this_turn == 0;
                let double_pass = is_pass && self.state.turn.consecutive_passes >= 1;
                if double_pass {
                    Ok((
                        vec![
                            Mutation::AdvanceTurn { next },
                            Mutation::SetPhase {
                                phase: GamePhase::Scoring,
                            },
                        ],
                        vec![PendingEffect::System(SystemEffect::ResolveScoring)],
                    ))
                } else {
                    Ok((
                        vec![
                            Mutation::AdvanceTurn { next },
                            Mutation::SetPhase {
                                phase: GamePhase::ActivePlay(next),
                            },
                        ],
                        vec![PendingEffect::System(SystemEffect::StartTurn { side: next })],
                    ))
                }
            }

            SystemEffect::BeginRaid { room } => {
                self.emitter.push_both(Command::VisitRoom { room });
                self.emitter.push_both(Command::SetMusic(MusicState::Raid));

                let mut muts = vec![
                    Mutation::SetRaid {
                        raid: Some(RaidState { room, encounter: 0 }),
                    },
                    Mutation::SetPhase {
                        phase: GamePhase::RaidResolution,
                    },
                ];
                // The whole room turns face-up for the raider.
                let room_cards: Vec<CardId> = self.state.room_cards(room).to_vec();
                for &card in &room_cards {
                    if !self.state.card(card)?.is_revealed_to(Side::Champion) {
                        muts.push(Mutation::SetRevealed {
                            card,
                            side: Side::Champion,
                            revealed: true,
                        });
                    }
                }

                // Defender alarms resolve before the first encounter.
                let mut followups = Vec::new();
                for &card in &room_cards {
                    self.queue_triggered(
                        card,
                        TriggerCondition::OnRaidBegin,
                        Some(room),
                        &mut followups,
                    )?;
                }
                followups.push(PendingEffect::System(SystemEffect::RaidEncounter { room }));
                Ok((muts, followups))
            }

            SystemEffect::RaidEncounter { room } => {
                let defenders = raid::room_minions(self.state, room, self.registry);
                let Some(&defender) = defenders.first() else {
                    return Ok((
                        Vec::new(),
                        vec![PendingEffect::System(SystemEffect::RaidAccess { room })],
                    ));
                };

                let encounter = self.state.raid.map(|r| r.encounter).unwrap_or(0);
                let attack = raid::champion_attack(self.state, self.registry);
                let defense = raid::minion_defense(self.state, defender, self.registry);
                self.emitter.push_both(Command::FireProjectile {
                    source: Side::Champion,
                    target: defender,
                });

                if attack >= defense {
                    log::debug!(
                        "{}: raid breaks {defender} ({attack} vs {defense})",
                        self.state.id
                    );
                    Ok((
                        vec![
                            Mutation::SetRaid {
                                raid: Some(RaidState {
                                    room,
                                    encounter: encounter + 1,
                                }),
                            },
                            Mutation::DestroyCard { card: defender },
                        ],
                        vec![PendingEffect::System(SystemEffect::RaidEncounter { room })],
                    ))
                } else {
                    log::debug!(
                        "{}: raid repelled by {defender} ({attack} vs {defense})",
                        self.state.id
                    );
                    self.emitter
                        .push_both(Command::DisplayGameMessage(MessageKind::RaidRepelled));
                    Ok((
                        vec![
                            Mutation::SetRaid { raid: None },
                            Mutation::SetPhase {
                                phase: GamePhase::ActivePlay(Side::Champion),
                            },
                        ],
                        Vec::new(),
                    ))
                }
            }

            SystemEffect::RaidAccess { room } => {
                self.emitter
                    .push_both(Command::DisplayGameMessage(MessageKind::RoomAccessed));
                let mut muts = Vec::new();
                match raid::capture_target(self.state, room, self.registry) {
                    Some(scheme) => {
                        self.emitter.push_both(Command::PlayEffect {
                            kind: FxKind::Capture,
                            target: Some(scheme),
                        });
                        muts.push(Mutation::CaptureScheme { card: scheme });
                    }
                    None => {
                        // Nothing to steal: loot the room's coffers.
                        muts.push(Mutation::AdjustMana {
                            side: Side::Champion,
                            kind: crate::core::ManaKind::Normal,
                            delta: 2,
                        });
                    }
                }
                muts.push(Mutation::SetRaid { raid: None });
                muts.push(Mutation::SetPhase {
                    phase: GamePhase::ActivePlay(Side::Champion),
                });
                Ok((muts, Vec::new()))
            }

            SystemEffect::ScoreScheme { card } => {
                Ok((vec![Mutation::ScoreScheme { card }], Vec::new()))
            }

            SystemEffect::CheckVictory => {
                let overlord = self.state.player(Side::Overlord).score;
                let champion = self.state.player(Side::Champion).score;
                if overlord >= POINTS_TO_WIN || champion >= POINTS_TO_WIN {
                    Ok((
                        vec![Mutation::SetPhase {
                            phase: GamePhase::Scoring,
                        }],
                        vec![PendingEffect::System(SystemEffect::ResolveScoring)],
                    ))
                } else {
                    Ok((Vec::new(), Vec::new()))
                }
            }

            SystemEffect::ResolveScoring => {
                let overlord = self.state.player(Side::Overlord).score;
                let champion = self.state.player(Side::Champion).score;
                let winner = match overlord.cmp(&champion) {
                    std::cmp::Ordering::Greater => Some(Side::Overlord),
                    std::cmp::Ordering::Less => Some(Side::Champion),
                    std::cmp::Ordering::Equal => None,
                };
                for side in [Side::Overlord, Side::Champion] {
                    let message = match winner {
                        Some(w) if w == side => MessageKind::Victory,
                        Some(_) => MessageKind::Defeat,
                        None => MessageKind::Draw,
                    };
                    self.emitter
                        .push_for(side, Command::DisplayGameMessage(message));
                }
                log::info!("{}: game over, winner {winner:?}", self.state.id);
                Ok((
                    vec![
                        Mutation::SetStatus {
                            status: GameStatus::Finished { winner },
                        },
                        Mutation::SetPhase {
                            phase: GamePhase::GameOver,
                        },
                    ],
                    Vec::new(),
                ))
            }
        }
    }

    /// Turn a validated action into its initial mutations and effects.
    fn action_effects(
        &mut self,
        side: Side,
        action: &UserAction,
    ) -> Result<(Vec<Mutation>, Vec<PendingEffect>)> {
        let cost = action.cost(self.state, self.registry)?;
        let mut muts = Vec::new();
        if cost.action_points > 0 {
            muts.push(Mutation::AdjustActionPoints {
                side,
                delta: -(cost.action_points as i64),
            });
        }
        if cost.mana > 0 {
            muts.push(Mutation::PayMana {
                side,
                amount: cost.mana,
                allow_restricted: cost.allow_restricted,
            });
        }

        let mut followups = Vec::new();
        match action {
            UserAction::GainMana => {
                muts.push(Mutation::AdjustMana {
                    side,
                    kind: crate::core::ManaKind::Normal,
                    delta: 1,
                });
            }

            UserAction::DrawCard => {
                muts.push(Mutation::DrawFromDeck { side });
            }

            UserAction::SpendActionPoint => {}

            UserAction::LevelUpRoom(room) => {
                self.emitter.push_both(Command::PlayEffect {
                    kind: FxKind::LevelUp,
                    target: None,
                });
                // Schemes advance toward their threshold; projects bank
                // room levels.
                for &card in self.state.room_cards(*room) {
                    let Ok(card_state) = self.state.card(card) else {
                        continue;
                    };
                    let Ok(def) = self.registry.lookup(card_state.def) else {
                        continue;
                    };
                    let kind = match def.kind {
                        CardKind::Scheme => CounterKind::Progress,
                        CardKind::Project => CounterKind::Level,
                        _ => continue,
                    };
                    muts.push(Mutation::AddCounters {
                        card,
                        kind,
                        count: 1,
                    });
                }
            }

            UserAction::PlayCard { card, target } => {
                let def = self.registry.lookup(self.state.card(*card)?.def)?;
                let from = ZoneAddr::new(side, Zone::Hand);
                let (to, reveal_to_opponent) = match def.kind {
                    CardKind::Minion | CardKind::Scheme | CardKind::Project => {
                        let Some(ActionTarget::Room(room)) = target else {
                            return Err(EngineError::RuleViolation(
                                "room placement without a room target".to_string(),
                            ));
                        };
                        (ZoneAddr::new(side, Zone::Room(*room)), false)
                    }
                    CardKind::Weapon | CardKind::Ally => {
                        (ZoneAddr::new(side, Zone::Arena), true)
                    }
                    CardKind::Spell => (ZoneAddr::new(side, Zone::Discard), true),
                    CardKind::Identity => {
                        return Err(EngineError::RuleViolation(
                            "identities are never played".to_string(),
                        ))
                    }
                };
                muts.push(Mutation::MoveCard {
                    card: *card,
                    from,
                    to,
                });
                if reveal_to_opponent {
                    muts.push(Mutation::SetRevealed {
                        card: *card,
                        side: side.opponent(),
                        revealed: true,
                    });
                }

                // OnPlay abilities resolve after the card arrives.
                let room = match to.zone {
                    Zone::Room(room) => Some(room),
                    _ => None,
                };
                let chosen = match target {
                    Some(ActionTarget::Card(chosen)) => Some(*chosen),
                    _ => None,
                };
                for (index, ability) in def.abilities.iter().enumerate() {
                    if let Ability::Triggered {
                        when: TriggerCondition::OnPlay,
                        effect,
                    } = ability
                    {
                        followups.push(PendingEffect::Ability {
                            ability: AbilityId::new(def.id, index as u8),
                            source: *card,
                            spec: effect.clone(),
                            expected: to,
                            room,
                            chosen,
                            owner: side,
                        });
                    }
                }
            }

            UserAction::InitiateRaid(room) => {
                followups.push(PendingEffect::System(SystemEffect::BeginRaid { room: *room }));
            }

            UserAction::Standard(standard) => match standard.payload {
                StandardPayload::KeepOpeningHand => {
                    muts.push(Mutation::DecideMulligan { side });
                    followups.push(PendingEffect::System(SystemEffect::FinishMulligan));
                }
                StandardPayload::MulliganOpeningHand => {
                    muts.push(Mutation::DecideMulligan { side });
                    muts.push(Mutation::ReturnHandToDeck { side });
                    muts.push(Mutation::ShuffleDeck { side });
                    for _ in 0..OPENING_HAND_SIZE {
                        muts.push(Mutation::DrawFromDeck { side });
                    }
                    followups.push(PendingEffect::System(SystemEffect::FinishMulligan));
                }
                StandardPayload::EndTurn => {
                    followups.push(PendingEffect::System(SystemEffect::EndTurn { side }));
                }
                StandardPayload::ActivateAbility { card, index } => {
                    let card_state = self.state.card(card)?;
                    let expected = card_state.location;
                    let room = match expected.zone {
                        Zone::Room(room) => Some(room),
                        _ => None,
                    };
                    let def = self.registry.lookup(card_state.def)?;
                    let Some(Ability::Activated { effect, .. }) =
                        def.abilities.get(index as usize)
                    else {
                        return Err(EngineError::RuleViolation(format!(
                            "{card} slot {index} is not an activated ability"
                        )));
                    };
                    followups.push(PendingEffect::Ability {
                        ability: AbilityId::new(def.id, index),
                        source: card,
                        spec: effect.clone(),
                        expected,
                        room,
                        chosen: None,
                        owner: side,
                    });
                }
            },
        }

        Ok((muts, followups))
    }
}
