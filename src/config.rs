//! Runtime configuration loaded from `galaga_swarm.toml`.
//!
//! Every key is optional; anything missing keeps the compiled default from
//! [`crate::constants`]. A missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::constants::{NORMAL_HEIGHT, NORMAL_WIDTH, START_LEVEL, TICK_MS};
use crate::entities::Screen;

pub const DEFAULT_CONFIG_FILE: &str = "galaga_swarm.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    // ── Simulation ────────────────────────────────────────────────────────────
    pub tick_ms: u64,
    pub screen_width: i32,
    pub screen_height: i32,
    pub start_level: u32,
    /// Fixed RNG seed for reproducible games; entropy when absent.
    pub seed: Option<u64>,

    // ── Files ─────────────────────────────────────────────────────────────────
    /// External level list; the built-in levels are used when absent.
    pub levels_file: Option<PathBuf>,
    pub high_score_file: PathBuf,

    // ── Logging ───────────────────────────────────────────────────────────────
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            screen_width: NORMAL_WIDTH,
            screen_height: NORMAL_HEIGHT,
            start_level: START_LEVEL,
            seed: None,
            levels_file: None,
            high_score_file: PathBuf::from("galaga_swarm_scores.toml"),
            log_file: PathBuf::from("galaga_swarm.log"),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Reads `path`, falling back to defaults when the file is missing or
    /// does not parse.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                eprintln!("⚠ Failed to parse {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn screen(&self) -> Screen {
        Screen::new(
            self.screen_width.max(NORMAL_WIDTH / 2),
            self.screen_height.max(NORMAL_HEIGHT / 2),
        )
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
