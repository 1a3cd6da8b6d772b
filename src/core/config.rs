//! Game configuration.
//!
//! The state machine never hardcodes the pair count, symbol set, or
//! animation timing - embeddings configure these at startup and the
//! defaults reproduce the classic 4x4 / 8-pair game.

use std::time::Duration;

/// Default number of pairs (16 cards, a 4x4 grid).
pub const DEFAULT_PAIR_COUNT: usize = 8;

/// Default symbol set, one per pair.
pub const DEFAULT_SYMBOLS: [&str; 8] = ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼"];

/// Delays between the timed phases of the flip/match/collect sequence.
///
/// These drive scheduled state transitions, not rendering: the embedding
/// is expected to animate within the same windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationDurations {
    /// How long a matched pair stays highlighted before collection starts.
    pub match_highlight: Duration,

    /// How long the collection animation runs before the cards leave the grid.
    pub collection_move: Duration,

    /// How long mismatched cards stay revealed before flipping back.
    pub auto_flip_back: Duration,
}

impl Default for AnimationDurations {
    fn default() -> Self {
        Self {
            match_highlight: Duration::from_millis(600),
            collection_move: Duration::from_millis(1000),
            auto_flip_back: Duration::from_millis(1200),
        }
    }
}

/// Complete configuration for one game.
///
/// ## Example
///
/// ```
/// use memory_match::GameConfig;
///
/// let config = GameConfig::default();
/// assert_eq!(config.pair_count, 8);
/// assert_eq!(config.card_count(), 16);
///
/// let small = GameConfig::default().with_pair_count(4);
/// assert_eq!(small.card_count(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Number of distinct pairs in the deck.
    pub pair_count: usize,

    /// Symbols drawn on card faces. Must hold at least `pair_count` entries;
    /// the first `pair_count` are used, in pair-key order.
    pub symbols: Vec<String>,

    /// Timed-transition delays.
    pub durations: AnimationDurations,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pair_count: DEFAULT_PAIR_COUNT,
            symbols: DEFAULT_SYMBOLS.iter().map(|s| (*s).to_string()).collect(),
            durations: AnimationDurations::default(),
        }
    }
}

impl GameConfig {
    /// Set the pair count.
    ///
    /// Panics if `count` is zero or exceeds the symbol set.
    #[must_use]
    pub fn with_pair_count(mut self, count: usize) -> Self {
        assert!(count > 0, "Pair count must be positive");
        assert!(
            count <= self.symbols.len(),
            "Pair count {} exceeds symbol set size {}",
            count,
            self.symbols.len()
        );
        self.pair_count = count;
        self
    }

    /// Replace the symbol set. Pair count follows the new set's size.
    ///
    /// Panics if `symbols` is empty.
    #[must_use]
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        assert!(!self.symbols.is_empty(), "Symbol set must not be empty");
        self.pair_count = self.symbols.len();
        self
    }

    /// Set the timed-transition delays.
    #[must_use]
    pub fn with_durations(mut self, durations: AnimationDurations) -> Self {
        self.durations = durations;
        self
    }

    /// Total number of cards in a deck (two per pair).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }
}
