//! Game state, validation, resolution and orchestration

pub mod actions;
pub mod mutation;
pub mod orchestrator;
pub mod phase;
pub mod raid;
pub mod resolver;
pub mod state;
pub mod validator;

pub use actions::{ActionTarget, StandardAction, StandardPayload, UserAction};
pub use mutation::{Applied, Mutation};
pub use orchestrator::{apply_action, GameConfig, GameSessions};
pub use phase::{GamePhase, GameStatus, TurnState, POINTS_TO_WIN};
pub use resolver::MAX_RESOLUTION_DEPTH;
pub use state::{GameRng, GameState, RaidState};
