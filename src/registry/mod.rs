//! Card definition registry
//!
//! Static mapping from definition identity to ability set and targeting
//! rules. The registry is immutable after load; the process-wide instance
//! is initialized once and shared read-only.

pub mod abilities;
pub mod definition;
pub mod sets;

pub use abilities::{
    Ability, AbilityCost, EffectSpec, EffectTarget, Recipient, ReplacedEvent, StaticAbility,
    TriggerCondition,
};
pub use definition::{CardDefinition, CardKind, CardStats, Targeting};

use crate::core::DefId;
use crate::{EngineError, Result};
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

static GLOBAL_REGISTRY: OnceLock<CardRegistry> = OnceLock::new();

/// Immutable lookup table of card definitions.
#[derive(Debug, Clone)]
pub struct CardRegistry {
    defs: FxHashMap<DefId, CardDefinition>,
}

impl CardRegistry {
    /// Build a registry from a definition list. Duplicate IDs are a data
    /// defect and fail loudly at load time.
    pub fn new(definitions: Vec<CardDefinition>) -> Result<Self> {
        let mut defs = FxHashMap::default();
        for def in definitions {
            let id = def.id;
            if defs.insert(id, def).is_some() {
                return Err(EngineError::RuleViolation(format!(
                    "duplicate card definition {id}"
                )));
            }
        }
        Ok(CardRegistry { defs })
    }

    /// The process-wide registry holding the built-in base set.
    pub fn global() -> &'static CardRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            CardRegistry::new(sets::base_set()).expect("base set definitions are valid")
        })
    }

    pub fn lookup(&self, id: DefId) -> Result<&CardDefinition> {
        self.defs.get(&id).ok_or(EngineError::UnknownCard(id.as_u32()))
    }

    pub fn contains(&self, id: DefId) -> bool {
        self.defs.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
