//! Render contract.
//!
//! The game exposes a grid snapshot the embedding can draw without
//! knowing any game rules: for each slot, a card face or the empty
//! space left by a collected pair, plus a disabled flag. Clicks come
//! back as `CardId` intents via `MemoryGame::on_card_click`.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PairKey};

/// Face data for a card still in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    /// Identity to report back on click.
    pub id: CardId,

    /// Pairing key, in case the embedding themes by pair.
    pub key: PairKey,

    /// Symbol to draw when face-up.
    pub symbol: String,

    /// Face-up.
    pub flipped: bool,

    /// Matched, awaiting or past the highlight phase.
    pub matched: bool,

    /// Mid collection animation.
    pub collecting: bool,
}

/// One grid slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSlot {
    /// The card, or `None` once its pair has been collected.
    pub card: Option<CardFace>,

    /// True when clicks are currently refused: two cards pending
    /// comparison, or the game phase blocks input.
    pub disabled: bool,
}
