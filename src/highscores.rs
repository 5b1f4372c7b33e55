//! High-score table.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_SCORE_ENTRIES, MAX_NAME_LEN};

/// What the game needs from wherever high scores are kept.
pub trait HighScoreStore {
    /// 1-based rank `score` would take, 0 if it does not make the table.
    fn determine_rank(&self, score: u32) -> usize;
    fn add(&mut self, name: &str, level: u32, score: u32);
    /// Current table, best first.
    fn entries(&self) -> &[HighScoreEntry];
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub level: u32,
    pub score: u32,
}

/// Best scores first, at most `HIGH_SCORE_ENTRIES` of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Reads the table from a TOML file. A missing or unreadable file
    /// gives an empty table.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match toml::from_str::<HighScores>(&text) {
            Ok(mut scores) => {
                scores.entries.truncate(HIGH_SCORE_ENTRIES);
                scores
            }
            Err(e) => {
                warn!("ignoring high score file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let text = toml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, text)
    }
}

impl HighScoreStore for HighScores {
    fn determine_rank(&self, score: u32) -> usize {
        match self.entries.iter().position(|e| score > e.score) {
            Some(i) => i + 1,
            None if self.entries.len() < HIGH_SCORE_ENTRIES => self.entries.len() + 1,
            None => 0,
        }
    }

    fn add(&mut self, name: &str, level: u32, score: u32) {
        let rank = self.determine_rank(score);
        if rank == 0 {
            return;
        }
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                name,
                level,
                score,
            },
        );
        self.entries.truncate(HIGH_SCORE_ENTRIES);
    }

    fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}
