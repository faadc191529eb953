//! Leaderboard of finished runs
//!
//! Runs rank by score, then by the level they reached. Runs that tie on
//! both keep the order they were recorded in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Runs kept on the board
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    /// Level the clock ran out on
    pub level: u32,
    /// Ducks shot over the whole run
    pub ducks: u32,
    /// Unix time (ms)
    pub timestamp: f64,
}

impl RunRecord {
    /// Record for a `GameOver` event; other events yield nothing
    pub fn from_event(event: &GameEvent, timestamp: f64) -> Option<Self> {
        match *event {
            GameEvent::GameOver {
                score,
                level,
                ducks,
            } => Some(Self {
                score,
                level,
                ducks,
                timestamp,
            }),
            _ => None,
        }
    }

    /// `Less` when `self` belongs above `other`
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.level.cmp(&self.level))
    }
}

/// Best runs, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    runs: Vec<RunRecord>,
}

impl HighScores {
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    pub fn best(&self) -> Option<&RunRecord> {
        self.runs.first()
    }

    /// Place a run on the board. Returns its 1-based rank, or `None` when it
    /// scored nothing or ranks below a full board.
    pub fn record(&mut self, run: RunRecord) -> Option<usize> {
        if run.score == 0 {
            return None;
        }
        // Below every run that ranks the same or better
        let index = self
            .runs
            .partition_point(|r| r.rank_cmp(&run) != Ordering::Greater);
        if index >= MAX_HIGH_SCORES {
            return None;
        }
        self.runs.insert(index, run);
        self.runs.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }

    /// Record the run a `GameOver` event describes
    pub fn record_game_over(&mut self, event: &GameEvent, timestamp: f64) -> Option<usize> {
        RunRecord::from_event(event, timestamp).and_then(|run| self.record(run))
    }

    /// Parse a stored board, restoring order and the size cap
    pub fn from_json(json: &str) -> Option<Self> {
        let mut runs: Vec<RunRecord> = serde_json::from_str(json).ok()?;
        runs.retain(|r| r.score > 0);
        runs.sort_by(RunRecord::rank_cmp);
        runs.truncate(MAX_HIGH_SCORES);
        Some(Self { runs })
    }

    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duck_hunt_highscores";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    /// Load the board from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = Self::storage()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| Self::from_json(&json));

        match stored {
            Some(board) => {
                log::info!("Loaded {} high scores", board.runs.len());
                board
            }
            None => Self::default(),
        }
    }

    /// Save the board to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = Self::storage() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Could not write high scores");
                }
            }
            Err(e) => log::warn!("Could not encode high scores: {}", e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
