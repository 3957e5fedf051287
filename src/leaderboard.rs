//! Best-rounds leaderboard
//!
//! Persisted to LocalStorage, keeps the top 10 rounds. Fewer strokes is
//! better.

use serde::{Deserialize, Serialize};

/// Maximum number of rounds to keep
pub const MAX_ENTRIES: usize = 10;

/// A finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Total strokes, penalties included
    pub total_strokes: u32,
    /// Strokes relative to course par
    pub par_diff: i32,
    /// Unix timestamp (ms) when played
    pub timestamp: f64,
}

/// Best rounds, sorted ascending by strokes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_golf_leaderboard";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a round makes the board
    pub fn qualifies(&self, total_strokes: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries
            .last()
            .map(|e| total_strokes < e.total_strokes)
            .unwrap_or(true)
    }

    /// Rank a round would get (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, total_strokes: u32) -> Option<usize> {
        if !self.qualifies(total_strokes) {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| total_strokes < e.total_strokes);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a round if it qualifies; returns the rank achieved
    ///
    /// Ties go after existing entries with the same stroke count.
    pub fn add_score(
        &mut self,
        name: impl Into<String>,
        total_strokes: u32,
        par_diff: i32,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.qualifies(total_strokes) {
            return None;
        }

        let entry = LeaderboardEntry {
            name: name.into(),
            total_strokes,
            par_diff,
            timestamp,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| total_strokes < e.total_strokes);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_ENTRIES);

        log::info!("Leaderboard rank {} ({} strokes)", rank, total_strokes);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<Leaderboard>(&json) {
                    log::info!("Loaded {} leaderboard entries", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board() -> Leaderboard {
        let mut board = Leaderboard::new();
        for strokes in 20..30 {
            board.add_score(format!("P{}", strokes), strokes, strokes as i32 - 17, 0.0);
        }
        board
    }

    #[test]
    fn test_lower_strokes_rank_higher() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score("Ann", 20, 3, 1.0), Some(1));
        assert_eq!(board.add_score("Bob", 15, -2, 2.0), Some(1));
        assert_eq!(board.add_score("Cat", 18, 1, 3.0), Some(2));

        let strokes: Vec<u32> = board.entries.iter().map(|e| e.total_strokes).collect();
        assert_eq!(strokes, vec![15, 18, 20]);
        assert_eq!(board.best().map(|e| e.name.as_str()), Some("Bob"));
    }

    #[test]
    fn test_ties_go_after_existing() {
        let mut board = Leaderboard::new();
        board.add_score("Ann", 17, 0, 1.0);
        assert_eq!(board.add_score("Bob", 17, 0, 2.0), Some(2));
    }

    #[test]
    fn test_full_board_rejects_worse_round() {
        let mut board = full_board();
        assert!(!board.qualifies(29));
        assert_eq!(board.potential_rank(35), None);
        assert_eq!(board.add_score("Late", 30, 13, 0.0), None);
        assert_eq!(board.entries.len(), MAX_ENTRIES);
    }

    #[test]
    fn test_full_board_drops_worst() {
        let mut board = full_board();
        assert_eq!(board.potential_rank(21), Some(3));
        assert_eq!(board.add_score("New", 21, 4, 0.0), Some(3));
        assert_eq!(board.entries.len(), MAX_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.total_strokes), Some(28));
    }
}
