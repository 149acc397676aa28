//! Renderer-facing commands
//!
//! The engine never talks to a renderer directly: every committed
//! mutation is translated into commands, batched per action into a
//! `CommandList`. Three guarantees hold: commands appear in exact
//! commit order, one resolver pass becomes one `CommandGroup` (played by
//! the renderer as a coordinated batch), and every list is built per
//! recipient so a side never receives face data for a card hidden from
//! it.

use crate::core::{CardId, CounterKind, DefId, ManaPool, PerSide, RoomId, Side};
use crate::game::state::{GameState, RaidState};
use crate::game::{Applied, GamePhase, Mutation};
use crate::registry::CardRegistry;
use crate::zones::ZoneAddr;
use serde::{Deserialize, Serialize};

/// Identity data for a revealed card face. Only ever sent to a recipient
/// entitled to see the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub def: DefId,
    pub name: String,
}

/// One object's movement, as seen by one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMove {
    pub card: CardId,
    pub to: ZoneAddr,
    /// Render sort key within the destination
    pub position: u32,
    /// None when the recipient may not see the face
    pub face: Option<CardFace>,
}

/// Public numbers for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideView {
    pub mana: ManaPool,
    pub action_points: u32,
    pub score: u32,
    pub deck_count: usize,
    pub hand_count: usize,
    pub discard_count: usize,
}

/// Snapshot of everything a recipient is entitled to know about the
/// overall game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub viewer: Side,
    pub turn: u32,
    pub phase: GamePhase,
    pub raid: Option<RaidState>,
    pub you: SideView,
    pub opponent: SideView,
}

/// Visual flourish kinds for `PlayEffect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxKind {
    Destroy,
    Capture,
    Score,
    LevelUp,
}

/// Messages shown verbatim to a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    RaidRepelled,
    RoomAccessed,
    Victory,
    Defeat,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicState {
    Main,
    Raid,
}

/// One renderer instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    UpdateGameView(GameView),
    MoveGameObjects(Vec<ObjectMove>),
    /// Face or counters of a card changed in place
    UpdateCardView {
        card: CardId,
        face: Option<CardFace>,
        counters: Vec<(CounterKind, u32)>,
    },
    CreateTokenCard {
        card: CardId,
        parent: CardId,
        location: ZoneAddr,
        face: Option<CardFace>,
    },
    FireProjectile {
        source: Side,
        target: CardId,
    },
    PlayEffect {
        kind: FxKind,
        target: Option<CardId>,
    },
    VisitRoom {
        room: RoomId,
    },
    DisplayGameMessage(MessageKind),
    SetMusic(MusicState),
}

/// Commands produced by one resolver pass; the renderer plays a group as
/// one coordinated batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandGroup {
    pub commands: Vec<Command>,
}

/// All commands produced by one external action, including its whole
/// trigger cascade. Append-only; never mutated after emission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandList {
    pub groups: Vec<CommandGroup>,
}

impl CommandList {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.commands.is_empty())
    }

    /// Flat iteration in playback order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> + '_ {
        self.groups.iter().flat_map(|g| g.commands.iter())
    }
}

/// Accumulates per-recipient command streams during one action's
/// resolution.
#[derive(Debug, Default)]
pub struct CommandEmitter {
    finished: PerSide<Vec<CommandGroup>>,
    current: PerSide<Vec<Command>>,
}

impl CommandEmitter {
    pub fn new() -> Self {
        CommandEmitter::default()
    }

    fn face_for(
        state: &GameState,
        registry: &CardRegistry,
        card: CardId,
        recipient: Side,
    ) -> Option<CardFace> {
        let card_state = state.cards.get(&card)?;
        if !card_state.is_revealed_to(recipient) {
            return None;
        }
        let def = registry.lookup(card_state.def).ok()?;
        Some(CardFace {
            def: def.id,
            name: def.name.clone(),
        })
    }

    fn emit_move(
        &mut self,
        state: &GameState,
        registry: &CardRegistry,
        card: CardId,
        to: ZoneAddr,
    ) {
        for side in [Side::Overlord, Side::Champion] {
            let mv = ObjectMove {
                card,
                to,
                position: state.cards.get(&card).map(|c| c.position).unwrap_or(0),
                face: Self::face_for(state, registry, card, side),
            };
            self.push_for(side, Command::MoveGameObjects(vec![mv]));
        }
    }

    /// Append a command for one recipient only.
    pub fn push_for(&mut self, side: Side, command: Command) {
        self.current.get_mut(side).push(command);
    }

    /// Append a command for both recipients.
    pub fn push_both(&mut self, command: Command) {
        self.push_for(Side::Overlord, command.clone());
        self.push_for(Side::Champion, command);
    }

    /// Close the current group. Called at each resolver pass boundary.
    pub fn end_group(&mut self) {
        for side in [Side::Overlord, Side::Champion] {
            let commands = std::mem::take(self.current.get_mut(side));
            if !commands.is_empty() {
                self.finished.get_mut(side).push(CommandGroup { commands });
            }
        }
    }

    /// Translate one committed mutation. `state` is the state *after*
    /// the commit.
    pub fn emit(
        &mut self,
        state: &GameState,
        registry: &CardRegistry,
        mutation: &Mutation,
        applied: &Applied,
    ) {
        match (mutation, applied) {
            // Zone changes: each side sees the move, with face data only
            // where entitled.
            (_, &Applied::Moved { card, to, .. }) => {
                self.emit_move(state, registry, card, to);
            }
            (_, &Applied::Drew { card }) | (_, &Applied::Discarded { card }) => {
                let to = match state.cards.get(&card) {
                    Some(c) => c.location,
                    None => return,
                };
                self.emit_move(state, registry, card, to);
            }

            (_, &Applied::Created { card }) => {
                let card_state = match state.cards.get(&card) {
                    Some(c) => c,
                    None => return,
                };
                let parent = card_state.parent.unwrap_or(card);
                let location = card_state.location;
                for side in [Side::Overlord, Side::Champion] {
                    let face = Self::face_for(state, registry, card, side);
                    self.push_for(
                        side,
                        Command::CreateTokenCard {
                            card,
                            parent,
                            location,
                            face,
                        },
                    );
                }
            }

            (_, &Applied::Scored { card, .. }) => {
                let to = match state.cards.get(&card) {
                    Some(c) => c.location,
                    None => return,
                };
                self.emit_move(state, registry, card, to);
                self.push_both(Command::PlayEffect {
                    kind: FxKind::Score,
                    target: Some(card),
                });
            }

            (&Mutation::SetRevealed { card, side, revealed }, _) => {
                // Only the side whose sight changed gets an update.
                let face = if revealed {
                    Self::face_for(state, registry, card, side)
                } else {
                    None
                };
                let counters = state
                    .cards
                    .get(&card)
                    .map(|c| c.counters.iter().copied().collect())
                    .unwrap_or_default();
                self.push_for(side, Command::UpdateCardView { card, face, counters });
            }

            (&Mutation::AddCounters { card, .. }, _)
            | (&Mutation::RemoveCounters { card, .. }, _) => {
                // Counter totals are public; faces stay per-recipient.
                let counters: Vec<(CounterKind, u32)> = state
                    .cards
                    .get(&card)
                    .map(|c| c.counters.iter().copied().collect())
                    .unwrap_or_default();
                for side in [Side::Overlord, Side::Champion] {
                    self.push_for(
                        side,
                        Command::UpdateCardView {
                            card,
                            face: Self::face_for(state, registry, card, side),
                            counters: counters.clone(),
                        },
                    );
                }
            }

            // Raid start flavor (VisitRoom, raid music) is pushed by the
            // resolver when the raid begins; only the wind-down lives here
            // so encounter-counter updates stay silent.
            (&Mutation::SetRaid { raid: None }, _) => {
                self.push_both(Command::SetMusic(MusicState::Main));
            }

            // Resource, phase and turn changes are carried by the final
            // UpdateGameView.
            _ => {}
        }
    }

    /// Finish the stream: close the open group, append a fresh
    /// `UpdateGameView` for each recipient and produce the per-side lists.
    pub fn finish(mut self, state: &GameState) -> PerSide<CommandList> {
        self.end_group();
        for side in [Side::Overlord, Side::Champion] {
            let view = build_game_view(state, side);
            self.push_for(side, Command::UpdateGameView(view));
        }
        self.end_group();
        self.finished.map(|groups| CommandList { groups })
    }
}

fn side_view(state: &GameState, side: Side) -> SideView {
    let player = state.player(side);
    SideView {
        mana: player.mana,
        action_points: player.action_points,
        score: player.score,
        deck_count: player.zones.deck.len(),
        hand_count: player.zones.hand.len(),
        discard_count: player.zones.discard.len(),
    }
}

/// Build the state snapshot one recipient is entitled to.
pub fn build_game_view(state: &GameState, viewer: Side) -> GameView {
    GameView {
        viewer,
        turn: state.turn.number,
        phase: state.phase,
        raid: state.raid,
        you: side_view(state, viewer),
        opponent: side_view(state, viewer.opponent()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DefId, GameId};
    use crate::registry::sets;
    use crate::zones::Zone;

    fn test_state() -> (GameState, &'static CardRegistry) {
        let state = GameState::new(
            GameId::new(1),
            42,
            PerSide::new(sets::OVERLORD_IDENTITY, sets::CHAMPION_IDENTITY),
        );
        (state, CardRegistry::global())
    }

    #[test]
    fn test_move_masks_hidden_face() {
        let (mut state, registry) = test_state();
        let deck = ZoneAddr::new(Side::Overlord, Zone::Deck);
        let id = state.create_card(sets::TOMB_SENTINEL, Side::Overlord, deck, None);

        let mutation = Mutation::DrawFromDeck {
            side: Side::Overlord,
        };
        let applied = mutation.apply(&mut state, registry).unwrap();

        let mut emitter = CommandEmitter::new();
        emitter.emit(&state, registry, &mutation, &applied);
        let lists = emitter.finish(&state);

        let overlord_has_face = lists.overlord.iter().any(|c| {
            matches!(c, Command::MoveGameObjects(moves)
                if moves.iter().any(|m| m.card == id && m.face.is_some()))
        });
        let champion_sees_face = lists.champion.iter().any(|c| {
            matches!(c, Command::MoveGameObjects(moves)
                if moves.iter().any(|m| m.card == id && m.face.is_some()))
        });
        let champion_sees_move = lists.champion.iter().any(|c| {
            matches!(c, Command::MoveGameObjects(moves)
                if moves.iter().any(|m| m.card == id))
        });

        assert!(overlord_has_face);
        assert!(champion_sees_move);
        assert!(!champion_sees_face);
    }

    #[test]
    fn test_groups_preserve_order() {
        let mut emitter = CommandEmitter::new();
        emitter.push_both(Command::SetMusic(MusicState::Raid));
        emitter.end_group();
        emitter.push_both(Command::SetMusic(MusicState::Main));

        let (state, _) = test_state();
        let lists = emitter.finish(&state);
        // Two content groups plus the final view group.
        assert_eq!(lists.overlord.groups.len(), 3);
        assert_eq!(
            lists.overlord.groups[0].commands[0],
            Command::SetMusic(MusicState::Raid)
        );
    }

    #[test]
    fn test_view_shows_public_numbers_only() {
        let (mut state, _) = test_state();
        let deck = ZoneAddr::new(Side::Overlord, Zone::Deck);
        for _ in 0..3 {
            state.create_card(sets::TOMB_SENTINEL, Side::Overlord, deck, None);
        }
        let view = build_game_view(&state, Side::Champion);
        assert_eq!(view.viewer, Side::Champion);
        assert_eq!(view.opponent.deck_count, 3);
        assert_eq!(view.opponent.hand_count, 0);
    }

    #[test]
    fn test_empty_groups_dropped() {
        let mut emitter = CommandEmitter::new();
        emitter.end_group();
        emitter.end_group();
        let (state, _) = test_state();
        let lists = emitter.finish(&state);
        assert_eq!(lists.champion.groups.len(), 1); // just the view
    }

    #[test]
    fn test_unknown_def_yields_no_face() {
        let (mut state, registry) = test_state();
        let deck = ZoneAddr::new(Side::Overlord, Zone::Deck);
        let id = state.create_card(DefId::new(9999), Side::Overlord, deck, None);
        state.set_revealed(id, Side::Overlord, true).unwrap();
        assert!(CommandEmitter::face_for(&state, registry, id, Side::Overlord).is_none());
    }
}
