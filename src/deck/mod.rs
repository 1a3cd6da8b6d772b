//! Shuffled paired-deck generation.
//!
//! A deck holds exactly two cards per pair key, shuffled, all flags
//! cleared. Generation is a pure function of the configuration and the
//! RNG state - no side effects, so the same seed always deals the same
//! grid.

use crate::core::{Card, CardId, GameConfig, GameRng, PairKey};

/// Generate a freshly shuffled deck.
///
/// Two cards per pair key, `config.card_count()` cards total. Ids are
/// assigned after shuffling so a card's id is also its grid slot.
#[must_use]
pub fn generate_deck(config: &GameConfig, rng: &mut GameRng) -> Vec<Card> {
    let mut faces: Vec<(PairKey, &str)> = Vec::with_capacity(config.card_count());
    for (index, symbol) in config.symbols.iter().take(config.pair_count).enumerate() {
        let key = PairKey::new(index as u16);
        faces.push((key, symbol));
        faces.push((key, symbol));
    }

    rng.shuffle(&mut faces);

    faces
        .into_iter()
        .enumerate()
        .map(|(slot, (key, symbol))| Card::face_down(CardId::new(slot as u32), key, symbol))
        .collect()
}
