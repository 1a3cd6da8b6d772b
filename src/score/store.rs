//! Best-score persistence.
//!
//! A `ScoreStore` is a two-operation key-value interface scoped to a
//! single well-known record: load the best score, save a replacement.
//! Loads never fail - a missing or corrupt record reads as "no best
//! score yet". Only saves are fallible, and the caller decides when to
//! save (only on an improving completion).

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::GameScore;

/// Error persisting a score record.
#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    /// Could not write the score file.
    #[error("failed to write score file: {0}")]
    Io(#[from] io::Error),

    /// Could not serialize the score record.
    #[error("failed to serialize score: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence seam for the best-score record.
pub trait ScoreStore {
    /// The last saved best score, or `None` if absent or unreadable.
    ///
    /// Never surfaces failure: parse errors are treated as "no score"
    /// and logged at debug level.
    fn load(&self) -> Option<GameScore>;

    /// Persist unconditionally, replacing any existing record.
    fn save(&self, score: &GameScore) -> Result<(), ScoreStoreError>;
}

/// JSON file store, the localStorage analog for native embeddings.
#[derive(Clone, Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    /// Create a store backed by the file at `path`.
    ///
    /// The file is created on first save; parent directories too.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Option<GameScore> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no saved best score");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(score) => Some(score),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "ignoring corrupt best score");
                None
            }
        }
    }

    fn save(&self, score: &GameScore) -> Result<(), ScoreStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(score)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), moves = score.moves, time_secs = score.time_secs, "best score saved");
        Ok(())
    }
}

/// In-memory store for tests and headless embeddings.
///
/// Single-threaded by design, like the game itself.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    slot: RefCell<Option<GameScore>>,
}

impl MemoryScoreStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a best score.
    #[must_use]
    pub fn with_score(score: GameScore) -> Self {
        Self {
            slot: RefCell::new(Some(score)),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Option<GameScore> {
        self.slot.borrow().clone()
    }

    fn save(&self, score: &GameScore) -> Result<(), ScoreStoreError> {
        *self.slot.borrow_mut() = Some(score.clone());
        Ok(())
    }
}
