//! Card identity, pairing keys, and lifecycle flags.
//!
//! Every card carries four booleans that trace its path through a game:
//! face-down → `flipped` → `matched` → `collecting` → `collected`.
//!
//! ## Flag Invariants
//!
//! - `flipped` ⇒ not `collected`
//! - `collecting` ⇒ `matched`
//! - `collected` ⇒ not `flipped` and not `collecting`
//!
//! `Card::flags_consistent` checks these; the state machine upholds them
//! on every transition.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within one deck.
///
/// Ids are assigned after shuffling, so a card's id is also its grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The grid slot this card occupies.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Pairing key: index into the configured symbol set.
///
/// Exactly two cards in a deck share a given key; match comparison is
/// key equality, never symbol string comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(pub u16);

impl PairKey {
    /// Create a new pair key.
    #[must_use]
    pub const fn new(key: u16) -> Self {
        Self(key)
    }

    /// Get the raw key value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

/// A single card on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identity, doubles as grid slot.
    pub id: CardId,

    /// Pairing key shared with exactly one other card.
    pub key: PairKey,

    /// Symbol drawn on the face (from the configured symbol set).
    pub symbol: String,

    /// Face-up, awaiting or past comparison.
    pub flipped: bool,

    /// Successfully compared against its twin.
    pub matched: bool,

    /// Mid collection animation.
    pub collecting: bool,

    /// Removed from play; the slot renders empty.
    pub collected: bool,
}

impl Card {
    /// Create a face-down card with all flags cleared.
    #[must_use]
    pub fn face_down(id: CardId, key: PairKey, symbol: impl Into<String>) -> Self {
        Self {
            id,
            key,
            symbol: symbol.into(),
            flipped: false,
            matched: false,
            collecting: false,
            collected: false,
        }
    }

    /// Can this card be selected right now?
    ///
    /// Only face-down cards still in play accept clicks. A card that is
    /// flipped, matched, collecting, or collected is already handled.
    #[must_use]
    pub fn selectable(&self) -> bool {
        !self.flipped && !self.matched && !self.collecting && !self.collected
    }

    /// Check the flag invariants.
    #[must_use]
    pub fn flags_consistent(&self) -> bool {
        (!self.flipped || !self.collected)
            && (!self.collecting || self.matched)
            && (!self.collected || (!self.flipped && !self.collecting))
    }
}
