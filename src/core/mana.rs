//! Mana pools
//!
//! Each player has a single pool split into a freely spendable part and a
//! restricted part. Restricted mana is earmarked: the Overlord may spend
//! it only on leveling up rooms, the Champion only on initiating raids.
//! Payments that allow restricted mana always drain it first.

use crate::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the pool a gain or payment touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaKind {
    Normal,
    Restricted,
}

/// A player's mana pool. Copy-eligible: two u32 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    pub normal: u32,
    pub restricted: u32,
}

impl ManaPool {
    pub fn new() -> Self {
        ManaPool::default()
    }

    /// Total mana available when restricted mana is allowed.
    pub fn total(&self) -> u32 {
        self.normal + self.restricted
    }

    pub fn gain(&mut self, kind: ManaKind, amount: u32) {
        match kind {
            ManaKind::Normal => self.normal += amount,
            ManaKind::Restricted => self.restricted += amount,
        }
    }

    /// Can `amount` be paid? `allow_restricted` is true for the earmarked
    /// action of the pool's owner.
    pub fn can_pay(&self, amount: u32, allow_restricted: bool) -> bool {
        if allow_restricted {
            self.total() >= amount
        } else {
            self.normal >= amount
        }
    }

    /// Pay `amount`, draining restricted mana first where permitted.
    /// Fails without mutating if the pool cannot cover the cost; a pool
    /// never goes negative.
    pub fn pay(&mut self, amount: u32, allow_restricted: bool) -> Result<()> {
        let available = if allow_restricted {
            self.total()
        } else {
            self.normal
        };
        if available < amount {
            return Err(EngineError::InsufficientMana {
                needed: amount,
                available,
            });
        }
        let mut remaining = amount;
        if allow_restricted {
            let from_restricted = remaining.min(self.restricted);
            self.restricted -= from_restricted;
            remaining -= from_restricted;
        }
        self.normal -= remaining;
        Ok(())
    }

    /// Remove mana of one kind, failing if the pool would go negative.
    pub fn remove(&mut self, kind: ManaKind, amount: u32) -> Result<()> {
        let slot = match kind {
            ManaKind::Normal => &mut self.normal,
            ManaKind::Restricted => &mut self.restricted,
        };
        if *slot < amount {
            return Err(EngineError::InsufficientMana {
                needed: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        Ok(())
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.restricted > 0 {
            write!(f, "{}+{}r", self.normal, self.restricted)
        } else {
            write!(f, "{}", self.normal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_and_total() {
        let mut pool = ManaPool::new();
        pool.gain(ManaKind::Normal, 3);
        pool.gain(ManaKind::Restricted, 2);
        assert_eq!(pool.normal, 3);
        assert_eq!(pool.restricted, 2);
        assert_eq!(pool.total(), 5);
    }

    #[test]
    fn test_pay_restricted_first() {
        let mut pool = ManaPool {
            normal: 3,
            restricted: 2,
        };
        pool.pay(3, true).unwrap();
        assert_eq!(pool.restricted, 0);
        assert_eq!(pool.normal, 2);
    }

    #[test]
    fn test_pay_without_restricted() {
        let mut pool = ManaPool {
            normal: 1,
            restricted: 5,
        };
        assert!(!pool.can_pay(2, false));
        let err = pool.pay(2, false).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientMana {
                needed: 2,
                available: 1
            }
        );
        // Failed payment must not mutate.
        assert_eq!(pool.normal, 1);
        assert_eq!(pool.restricted, 5);
    }

    #[test]
    fn test_never_negative() {
        let mut pool = ManaPool::new();
        assert!(pool.pay(1, true).is_err());
        assert!(pool.remove(ManaKind::Normal, 1).is_err());
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ManaPool {
                normal: 4,
                restricted: 0
            }
            .to_string(),
            "4"
        );
        assert_eq!(
            ManaPool {
                normal: 1,
                restricted: 2
            }
            .to_string(),
            "1+2r"
        );
    }
}
