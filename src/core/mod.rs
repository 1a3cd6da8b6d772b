//! Core types: cards, pairing keys, configuration, RNG.
//!
//! These are the building blocks the deck generator and state machine
//! share. Embeddings configure the game via `GameConfig` rather than
//! modifying the core.

pub mod card;
pub mod config;
pub mod rng;

pub use card::{Card, CardId, PairKey};
pub use config::{AnimationDurations, GameConfig, DEFAULT_PAIR_COUNT, DEFAULT_SYMBOLS};
pub use rng::GameRng;
