//! High score leaderboard
//!
//! Tracks the top 10 runs across all mini-games for the lifetime of the
//! page session. Nothing is persisted: scores live in memory only and the
//! shell reads them as JSON.

use serde::Serialize;

use crate::games::GameKind;

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Which mini-game produced the run
    pub game: GameKind,
    /// Run length in ticks
    pub ticks: u64,
}

/// High score table for the page session
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    pub fn submit(&mut self, score: u64, game: GameKind, ticks: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, game, ticks };

        // Insertion point in the descending order
        let pos = self.entries.iter().position(|e| score > e.score);
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

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The overall best score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// The best score for one mini-game (if any)
    pub fn best_for(&self, game: GameKind) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| e.game == game)
            .map(|e| e.score)
            .max()
    }

    /// JSON view for the UI shell
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.submit(100, GameKind::Rhythm, 600), Some(1));
        assert_eq!(scores.submit(300, GameKind::Flappy, 900), Some(1));
        assert_eq!(scores.submit(200, GameKind::Surfer, 700), Some(2));
        assert_eq!(scores.top_score(), Some(300));
        let listed: Vec<u64> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(listed, vec![300, 200, 100]);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.submit(0, GameKind::Rhythm, 60), None);
    }

    #[test]
    fn test_table_truncates_at_capacity() {
        let mut scores = HighScores::new();
        for i in 1..=15u64 {
            scores.submit(i * 10, GameKind::Backstage, i);
        }
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        // The weakest surviving entry is the 10th best
        assert_eq!(scores.entries().last().unwrap().score, 60);
        assert_eq!(scores.submit(10, GameKind::Backstage, 1), None);
    }

    #[test]
    fn test_best_for_filters_by_game() {
        let mut scores = HighScores::new();
        scores.submit(500, GameKind::Shred, 100);
        scores.submit(900, GameKind::Flappy, 100);
        scores.submit(700, GameKind::Shred, 100);
        assert_eq!(scores.best_for(GameKind::Shred), Some(700));
        assert_eq!(scores.best_for(GameKind::Surfer), None);
    }

    #[test]
    fn test_json_snapshot() {
        let mut scores = HighScores::new();
        scores.submit(42, GameKind::Flappy, 1234);
        let json = scores.to_json();
        assert!(json.contains("\"game\":\"flappy\""));
        assert!(json.contains("\"score\":42"));
    }
}
