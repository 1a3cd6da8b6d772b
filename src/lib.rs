//! # memory-match
//!
//! Game core for a memory-matching card game: a grid of face-down cards
//! is revealed two at a time, matching pairs move into a collection
//! tray, and the game ends when every pair is collected, tracking moves
//! and elapsed time against a saved best score.
//!
//! ## Design Principles
//!
//! 1. **Logical time**: The crate owns no threads and no OS timers. The
//!    embedding advances a logical clock via `MemoryGame::advance`;
//!    flip-back and collection sequencing are scheduled transitions on
//!    that clock, cancelled wholesale when a new game starts.
//!
//! 2. **Pure render contract**: Rendering is out of scope. The game
//!    emits a grid snapshot (card-or-empty per slot plus a disabled
//!    flag) and accepts click intents by card id - nothing else crosses
//!    the boundary.
//!
//! 3. **Deterministic**: Deck shuffles come from a seeded ChaCha8 RNG,
//!    so any game can be replayed exactly in tests.
//!
//! ## Modules
//!
//! - `core`: cards, pairing keys, configuration, RNG
//! - `deck`: shuffled paired-deck generation
//! - `game`: the state machine, scheduler, and render contract
//! - `score`: scores, best-score comparison, persistence
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use memory_match::{GameConfig, GamePhase, MemoryGame, MemoryScoreStore};
//!
//! let mut game = MemoryGame::new(GameConfig::default(), 7);
//! let store = MemoryScoreStore::new();
//!
//! // Click both cards of every pair; ids are grid slots.
//! for key in 0..game.config().pair_count as u16 {
//!     let pair: Vec<_> = game
//!         .cards()
//!         .iter()
//!         .filter(|c| c.key.raw() == key)
//!         .map(|c| c.id)
//!         .collect();
//!     game.on_card_click(pair[0]);
//!     game.on_card_click(pair[1]);
//!     // Let the highlight and collection animations run out.
//!     game.advance(Duration::from_secs(2));
//! }
//!
//! assert_eq!(game.phase(), GamePhase::Complete);
//! let best = game.finish_score(&store).unwrap().unwrap();
//! assert_eq!(best.moves, 8);
//! ```

pub mod core;
pub mod deck;
pub mod game;
pub mod score;

pub use crate::core::{
    AnimationDurations, Card, CardId, GameConfig, GameRng, PairKey, DEFAULT_PAIR_COUNT,
    DEFAULT_SYMBOLS,
};

pub use crate::deck::generate_deck;

pub use crate::game::{CardFace, CollectedPair, GamePhase, GridSlot, MemoryGame};

pub use crate::score::{
    FileScoreStore, GameScore, MemoryScoreStore, ScoreStore, ScoreStoreError,
};
