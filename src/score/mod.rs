//! Game scores and best-score persistence.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use store::{FileScoreStore, MemoryScoreStore, ScoreStore, ScoreStoreError};

/// The outcome of one completed game.
///
/// Serialized as JSON with an RFC 3339 / ISO-8601 completion timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScore {
    /// Two-card comparisons made.
    pub moves: u32,

    /// Whole seconds of play time.
    pub time_secs: u64,

    /// When the game completed.
    pub completed_at: DateTime<Utc>,
}

impl GameScore {
    /// Create a score stamped with the current time.
    #[must_use]
    pub fn new(moves: u32, time_secs: u64) -> Self {
        Self {
            moves,
            time_secs,
            completed_at: Utc::now(),
        }
    }

    /// Strictly-better comparison, lexicographic on (moves, time):
    /// fewer moves wins outright; equal moves requires strictly less time.
    ///
    /// ```
    /// use memory_match::GameScore;
    ///
    /// let best = GameScore::new(10, 20);
    /// assert!(GameScore::new(8, 30).beats(&best));   // fewer moves, time irrelevant
    /// assert!(!GameScore::new(10, 25).beats(&best)); // tie on moves, slower
    /// assert!(!GameScore::new(10, 20).beats(&best)); // exact tie never replaces
    /// ```
    #[must_use]
    pub fn beats(&self, other: &GameScore) -> bool {
        self.moves < other.moves || (self.moves == other.moves && self.time_secs < other.time_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_moves_beats_regardless_of_time() {
        let best = GameScore::new(10, 20);
        assert!(GameScore::new(8, 30).beats(&best));
        assert!(GameScore::new(9, 999).beats(&best));
    }

    #[test]
    fn test_equal_moves_needs_strictly_less_time() {
        let best = GameScore::new(10, 20);
        assert!(GameScore::new(10, 19).beats(&best));
        assert!(!GameScore::new(10, 20).beats(&best));
        assert!(!GameScore::new(10, 25).beats(&best));
    }

    #[test]
    fn test_more_moves_never_beats() {
        let best = GameScore::new(10, 20);
        assert!(!GameScore::new(11, 1).beats(&best));
    }

    #[test]
    fn test_serde_round_trip_keeps_timestamp() {
        let score = GameScore::new(8, 42);
        let json = serde_json::to_string(&score).unwrap();
        let back: GameScore = serde_json::from_str(&json).unwrap();
        assert_eq!(score, back);
    }

    #[test]
    fn test_timestamp_is_iso_8601() {
        let score = GameScore::new(1, 2);
        let json = serde_json::to_value(&score).unwrap();
        let stamp = json["completed_at"].as_str().unwrap();
        assert!(stamp.parse::<DateTime<Utc>>().is_ok());
    }
}
