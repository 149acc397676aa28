//! Spellkeep - rules and matchmaking core for an asymmetric two-player
//! card game
//!
//! The engine owns canonical game state, validates and resolves actions,
//! and emits a deterministic, replayable stream of commands for a remote
//! presentation layer.

pub mod commands;
pub mod core;
pub mod error;
pub mod game;
pub mod registry;
pub mod replay;
pub mod zones;

pub use error::{EngineError, Result};
