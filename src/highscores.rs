//! High score leaderboard
//!
//! Tracks the top 10 finished runs. Storage is left to the host; the
//! table round-trips through JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{GameOver, TerminalEvent};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub score: u64,
    /// Coins banked during the run
    pub currency: u32,
    /// How the run ended
    pub event: TerminalEvent,
    /// Run length in ticks
    pub ticks: u64,
}

impl From<GameOver> for RunRecord {
    fn from(over: GameOver) -> Self {
        Self {
            score: over.score,
            currency: over.currency,
            event: over.event,
            ticks: over.ticks,
        }
    }
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a finished run, returning the rank achieved
    ///
    /// Ties keep the earlier run ahead.
    pub fn add(&mut self, record: RunRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| record.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, record);
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New high score #{}: {}", pos + 1, record.score);
        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Coins earned by the runs still on the board
    pub fn leaderboard_currency(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.currency)).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored table, re-sorting and trimming whatever was saved
    pub fn from_json(json: &str) -> Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::debug!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunRecord {
        RunRecord {
            score,
            currency: (score / 10) as u32,
            event: TerminalEvent::Crashed,
            ticks: score * 2,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.potential_rank(0), None);
    }

    #[test]
    fn test_sorted_insert() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(run(100)), Some(1));
        assert_eq!(scores.add(run(300)), Some(1));
        assert_eq!(scores.add(run(200)), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 100]);
        assert_eq!(scores.top_score(), Some(300));
        assert_eq!(scores.leaderboard_currency(), 60);
    }

    #[test]
    fn test_tie_ranks_after_existing() {
        let mut scores = HighScores::new();
        scores.add(run(100));
        assert_eq!(scores.potential_rank(100), Some(2));
        assert_eq!(scores.add(run(100)), Some(2));
    }

    #[test]
    fn test_full_table() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add(run(i * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(10));
        assert_eq!(scores.add(run(5)), None);
        assert_eq!(scores.add(run(55)), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_json_reload() {
        let mut scores = HighScores::new();
        scores.add(run(40));
        scores.add(run(90));
        let json = scores.to_json().unwrap();
        assert_eq!(HighScores::from_json(&json).unwrap(), scores);
    }

    #[test]
    fn test_json_unsorted_is_repaired() {
        let mut scores = HighScores::new();
        scores.entries = (1..=12).map(run).collect();
        let json = serde_json::to_string(&scores).unwrap();
        let loaded = HighScores::from_json(&json).unwrap();
        assert_eq!(loaded.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(loaded.top_score(), Some(12));
        assert_eq!(loaded.entries.last().map(|e| e.score), Some(3));
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(HighScores::from_json("{not json").is_err());
    }

    #[test]
    fn test_from_game_over() {
        let over = GameOver {
            event: TerminalEvent::OutOfFuel,
            score: 1234,
            currency: 7,
            ticks: 600,
        };
        let record = RunRecord::from(over);
        assert_eq!(record.event, TerminalEvent::OutOfFuel);
        assert_eq!(record.score, 1234);
    }
}
