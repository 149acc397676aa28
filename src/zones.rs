//! Game zones (Deck, Hand, Discard, Rooms, Arena, Score)

use crate::core::{CardId, RoomId, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Ordered; the draw end is the back of the list.
    Deck,
    Hand,
    /// Ordered; most recent discard at the back.
    Discard,
    /// One of the keep's rooms (Overlord placements).
    Room(RoomId),
    /// The Champion's in-play area.
    Arena,
    /// Scored/captured schemes.
    Score,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Deck => write!(f, "deck"),
            Zone::Hand => write!(f, "hand"),
            Zone::Discard => write!(f, "discard"),
            Zone::Room(room) => write!(f, "{room}"),
            Zone::Arena => write!(f, "arena"),
            Zone::Score => write!(f, "score"),
        }
    }
}

impl Zone {
    /// Zones where a card participates in the game (abilities live, statics
    /// apply, replacements watch).
    pub fn is_in_play(&self) -> bool {
        matches!(self, Zone::Room(_) | Zone::Arena)
    }
}

/// A concrete zone container: one side's zone of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneAddr {
    pub side: Side,
    pub zone: Zone,
}

impl ZoneAddr {
    pub fn new(side: Side, zone: Zone) -> Self {
        ZoneAddr { side, zone }
    }
}

impl fmt::Display for ZoneAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.side, self.zone)
    }
}

/// A zone containing cards.
///
/// Order always matters: Deck and Discard are ordered by the rules, and the
/// other zones keep insertion order so iteration is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardZone {
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new() -> Self {
        CardZone { cards: Vec::new() }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // Order-preserving removal: iteration order feeds legal-action
            // enumeration and command emission, so swap_remove would break
            // determinism.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from the top (for Deck).
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Look at the top card without removing it.
    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Shuffle the zone (for Deck).
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

/// Collection of all zones for one side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub deck: CardZone,
    pub hand: CardZone,
    pub discard: CardZone,
    pub arena: CardZone,
    pub score: CardZone,
    /// Room placements, indexed by `RoomId`. Only the Overlord places into
    /// rooms; the Champion's stay empty.
    pub rooms: Vec<CardZone>,
}

impl PlayerZones {
    pub fn new() -> Self {
        PlayerZones {
            deck: CardZone::new(),
            hand: CardZone::new(),
            discard: CardZone::new(),
            arena: CardZone::new(),
            score: CardZone::new(),
            rooms: (0..crate::core::NUM_ROOMS).map(|_| CardZone::new()).collect(),
        }
    }

    pub fn get_zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Discard => &self.discard,
            Zone::Arena => &self.arena,
            Zone::Score => &self.score,
            Zone::Room(room) => &self.rooms[room.as_u8() as usize],
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Discard => &mut self.discard,
            Zone::Arena => &mut self.arena,
            Zone::Score => &mut self.score,
            Zone::Room(room) => &mut self.rooms[room.as_u8() as usize],
        }
    }

    /// All (zone, card) pairs on this side, in stable order.
    pub fn iter_all(&self) -> impl Iterator<Item = (Zone, CardId)> + '_ {
        let fixed = [
            (Zone::Deck, &self.deck),
            (Zone::Hand, &self.hand),
            (Zone::Discard, &self.discard),
            (Zone::Arena, &self.arena),
            (Zone::Score, &self.score),
        ];
        fixed
            .into_iter()
            .chain(
                self.rooms
                    .iter()
                    .enumerate()
                    .map(|(i, z)| (Zone::Room(RoomId::new(i as u8)), z)),
            )
            .flat_map(|(zone, z)| z.cards.iter().map(move |&id| (zone, id)))
    }
}

impl Default for PlayerZones {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_zone() {
        let mut zone = CardZone::new();
        assert!(zone.is_empty());

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);

        zone.add(card1);
        zone.add(card2);

        assert_eq!(zone.len(), 2);
        assert!(zone.contains(card1));

        assert!(zone.remove(card1));
        assert_eq!(zone.len(), 1);
        assert!(!zone.contains(card1));
        assert!(!zone.remove(card1));
    }

    #[test]
    fn test_deck_operations() {
        let mut deck = CardZone::new();
        let card1 = CardId::new(10);
        let card2 = CardId::new(11);
        let card3 = CardId::new(12);

        deck.add(card1); // Bottom
        deck.add(card2);
        deck.add(card3); // Top

        assert_eq!(deck.peek_top(), Some(card3));
        assert_eq!(deck.draw_top(), Some(card3));
        assert_eq!(deck.draw_top(), Some(card2));
        assert_eq!(deck.draw_top(), Some(card1));
        assert_eq!(deck.draw_top(), None);
    }

    #[test]
    fn test_removal_preserves_order() {
        let mut zone = CardZone::new();
        for i in 0..5 {
            zone.add(CardId::new(i));
        }
        zone.remove(CardId::new(2));
        let order: Vec<u32> = zone.cards.iter().map(|c| c.as_u32()).collect();
        assert_eq!(order, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_player_zones_iter_all() {
        let mut zones = PlayerZones::new();
        zones.deck.add(CardId::new(1));
        zones.hand.add(CardId::new(2));
        zones.rooms[3].add(CardId::new(3));

        let all: Vec<(Zone, CardId)> = zones.iter_all().collect();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&(Zone::Room(RoomId::new(3)), CardId::new(3))));
    }
}
