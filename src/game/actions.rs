//! Player actions
//!
//! `UserAction` is the closed set of things a client (or AI) can submit.
//! Costs are declared here; legality lives in the validator and the
//! actual state transitions in the resolver.

use crate::commands::CommandList;
use crate::core::{CardId, RoomId, Side};
use crate::game::state::GameState;
use crate::game::validator;
use crate::registry::{Ability, CardRegistry, Targeting};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Mana cost to level up a room.
pub const LEVEL_UP_COST: u32 = 2;

/// Mana cost to initiate a raid.
pub const RAID_COST: u32 = 1;

/// A chosen target for a targeted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTarget {
    Room(RoomId),
    Card(CardId),
}

/// Payloads carried by `UserAction::Standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardPayload {
    KeepOpeningHand,
    MulliganOpeningHand,
    EndTurn,
    ActivateAbility { card: CardId, index: u8 },
}

/// A standard action: a payload plus an optional optimistic command list
/// the client may have already played locally. The engine carries the
/// optimistic part opaquely and never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardAction {
    pub payload: StandardPayload,
    pub optimistic: Option<CommandList>,
}

impl StandardAction {
    pub fn new(payload: StandardPayload) -> Self {
        StandardAction {
            payload,
            optimistic: None,
        }
    }
}

/// Everything a player can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserAction {
    /// Spend an action point for one mana
    GainMana,
    /// Spend an action point to draw a card
    DrawCard,
    /// Level up a room's contents (Overlord)
    LevelUpRoom(RoomId),
    /// Play a card from hand
    PlayCard {
        card: CardId,
        target: Option<ActionTarget>,
    },
    /// Raid a room (Champion)
    InitiateRaid(RoomId),
    /// Burn an action point
    SpendActionPoint,
    Standard(StandardAction),
}

impl UserAction {
    pub fn end_turn() -> Self {
        UserAction::Standard(StandardAction::new(StandardPayload::EndTurn))
    }

    pub fn keep_hand() -> Self {
        UserAction::Standard(StandardAction::new(StandardPayload::KeepOpeningHand))
    }

    pub fn mulligan() -> Self {
        UserAction::Standard(StandardAction::new(StandardPayload::MulliganOpeningHand))
    }

    /// True when resolving this action should count toward the turn's
    /// action tally (pass detection).
    pub fn counts_as_turn_action(&self) -> bool {
        !matches!(
            self,
            UserAction::Standard(StandardAction {
                payload: StandardPayload::EndTurn
                    | StandardPayload::KeepOpeningHand
                    | StandardPayload::MulliganOpeningHand,
                ..
            })
        )
    }
}

/// Declared cost of an action in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionCost {
    pub action_points: u32,
    pub mana: u32,
    /// Whether the payment may draw on the earmarked pool
    pub allow_restricted: bool,
}

impl UserAction {
    /// Compute this action's declared cost. Fails only on unknown card
    /// references.
    pub fn cost(&self, state: &GameState, registry: &CardRegistry) -> Result<ActionCost> {
        Ok(match self {
            UserAction::GainMana | UserAction::DrawCard | UserAction::SpendActionPoint => {
                ActionCost {
                    action_points: 1,
                    ..ActionCost::default()
                }
            }
            UserAction::LevelUpRoom(_) => ActionCost {
                action_points: 1,
                mana: LEVEL_UP_COST,
                allow_restricted: true,
            },
            UserAction::InitiateRaid(_) => ActionCost {
                action_points: 1,
                mana: RAID_COST,
                allow_restricted: true,
            },
            UserAction::PlayCard { card, .. } => {
                let def = registry.lookup(state.card(*card)?.def)?;
                ActionCost {
                    action_points: 1,
                    mana: def.cost,
                    allow_restricted: false,
                }
            }
            UserAction::Standard(standard) => match standard.payload {
                StandardPayload::ActivateAbility { card, index } => {
                    let def = registry.lookup(state.card(card)?.def)?;
                    match def.abilities.get(index as usize) {
                        Some(Ability::Activated { cost, .. }) => ActionCost {
                            action_points: cost.action_points,
                            mana: cost.mana,
                            allow_restricted: false,
                        },
                        _ => ActionCost::default(),
                    }
                }
                _ => ActionCost::default(),
            },
        })
    }
}

/// Enumerate every action `validate` would accept for `side` right now.
///
/// This is the AI/search boundary: external tree search enumerates legal
/// moves here and simulates them through `apply_action`.
pub fn legal_actions(state: &GameState, side: Side, registry: &CardRegistry) -> Vec<UserAction> {
    let mut candidates = Vec::new();

    candidates.push(UserAction::keep_hand());
    candidates.push(UserAction::mulligan());
    candidates.push(UserAction::end_turn());
    candidates.push(UserAction::GainMana);
    candidates.push(UserAction::DrawCard);
    candidates.push(UserAction::SpendActionPoint);

    for room in RoomId::all() {
        candidates.push(UserAction::LevelUpRoom(room));
        candidates.push(UserAction::InitiateRaid(room));
    }

    // Plays from hand, with one candidate per legal target.
    let player = state.player(side);
    for &card in &player.zones.hand.cards {
        let def = match state.card(card).and_then(|c| registry.lookup(c.def)) {
            Ok(def) => def,
            Err(_) => continue,
        };
        match def.targeting {
            Targeting::None => candidates.push(UserAction::PlayCard { card, target: None }),
            Targeting::Room => {
                for room in RoomId::all() {
                    candidates.push(UserAction::PlayCard {
                        card,
                        target: Some(ActionTarget::Room(room)),
                    });
                }
            }
            Targeting::Arrow => {
                for target in validator::arrow_targets(state, side, registry) {
                    candidates.push(UserAction::PlayCard {
                        card,
                        target: Some(ActionTarget::Card(target)),
                    });
                }
            }
        }
    }

    // Activated abilities on in-play cards.
    for card in state.cards_in_play() {
        let Ok(card_state) = state.card(card) else {
            continue;
        };
        if card_state.owner != side {
            continue;
        }
        let Ok(def) = registry.lookup(card_state.def) else {
            continue;
        };
        for (index, ability) in def.abilities.iter().enumerate() {
            if matches!(ability, Ability::Activated { .. }) {
                candidates.push(UserAction::Standard(StandardAction::new(
                    StandardPayload::ActivateAbility {
                        card,
                        index: index as u8,
                    },
                )));
            }
        }
    }

    candidates
        .into_iter()
        .filter(|action| validator::validate(state, side, action, registry).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_action_classification() {
        assert!(UserAction::GainMana.counts_as_turn_action());
        assert!(UserAction::DrawCard.counts_as_turn_action());
        assert!(!UserAction::end_turn().counts_as_turn_action());
        assert!(!UserAction::keep_hand().counts_as_turn_action());
        assert!(UserAction::Standard(StandardAction::new(
            StandardPayload::ActivateAbility {
                card: CardId::new(1),
                index: 0
            }
        ))
        .counts_as_turn_action());
    }

    #[test]
    fn test_action_serde_round_trip() {
        let action = UserAction::PlayCard {
            card: CardId::new(4),
            target: Some(ActionTarget::Room(RoomId::new(2))),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: UserAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
