//! Core game types and identifiers

pub mod card;
pub mod ids;
pub mod mana;
pub mod player;

pub use card::{CardState, CounterKind};
pub use ids::{AbilityId, CardId, DefId, GameId, PerSide, RoomId, Side, NUM_ROOMS};
pub use mana::{ManaKind, ManaPool};
pub use player::{PlayerState, ACTIONS_PER_TURN, OPENING_HAND_SIZE};
