//! Level data: who flies in, from where, along which script, and when.
//!
//! Levels are authored in TOML (see `levels/levels.toml`, embedded into the
//! binary) and validated completely at load time. After that every lookup
//! is a direct index.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::constants::MAX_ALIENS;
use crate::error::{LevelError, LevelResult};
use crate::paths::{self, PathId, NUM_PATHS};

const BUILTIN_LEVELS: &str = include_str!("../levels/levels.toml");

/// Where an alien appears and the script it flies to reach the formation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EntryScript {
    /// Start position in the 400×500 authoring space.
    pub start: [i32; 2],
    pub path: PathId,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub entries: Vec<EntryScript>,
    /// Visual shape per slot; −1 leaves the slot empty this level.
    pub shapes: Vec<i32>,
    /// Entry script index per slot.
    pub slots: Vec<usize>,
    /// Ticks each slot waits before entering.
    pub delays: Vec<u32>,
}

impl Level {
    pub fn alien_shape(&self, id: usize) -> Option<u8> {
        u8::try_from(self.shapes[id]).ok()
    }

    pub fn alien_entry(&self, id: usize) -> &EntryScript {
        &self.entries[self.slots[id]]
    }

    pub fn alien_path(&self, id: usize) -> PathId {
        self.alien_entry(id).path
    }

    pub fn alien_enter_delay(&self, id: usize) -> u32 {
        self.delays[id]
    }

    fn validate(&self, level: usize) -> LevelResult<()> {
        for (field, got) in [
            ("shapes", self.shapes.len()),
            ("slots", self.slots.len()),
            ("delays", self.delays.len()),
        ] {
            if got != MAX_ALIENS {
                return Err(LevelError::SlotCount {
                    level,
                    field,
                    got,
                    expected: MAX_ALIENS,
                });
            }
        }
        for (entry, script) in self.entries.iter().enumerate() {
            if script.path >= NUM_PATHS {
                return Err(LevelError::PathOutOfRange {
                    level,
                    entry,
                    path: script.path,
                });
            }
        }
        for (slot, &entry) in self.slots.iter().enumerate() {
            if entry >= self.entries.len() {
                return Err(LevelError::EntryOutOfRange {
                    level,
                    slot,
                    entry,
                    available: self.entries.len(),
                });
            }
        }
        if let Some((slot, &shape)) = self
            .shapes
            .iter()
            .enumerate()
            .find(|&(_, &shape)| shape != -1 && u8::try_from(shape).is_err())
        {
            return Err(LevelError::ShapeOutOfRange { level, slot, shape });
        }
        if self.shapes.iter().all(|&shape| shape < 0) {
            return Err(LevelError::EmptyLevel { level });
        }
        Ok(())
    }
}

/// A level number split into its place in the cycle and the cycle count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelNumber {
    pub level_no: u32,
    /// 1-based index into the level list.
    pub real: u32,
    /// How many times the list has been played through, starting at 1.
    pub meta: u32,
}

/// Shrinks a tick count for repeated cycles:
/// `ceil(ticks / (1 + (meta − 1) × 0.5))`.
pub fn scale_ticks(ticks: i32, meta: u32) -> i32 {
    let divisor = 1.0 + meta.saturating_sub(1) as f64 * 0.5;
    (ticks as f64 / divisor).ceil() as i32
}

#[derive(Deserialize)]
struct LevelFile {
    #[serde(rename = "level", default)]
    levels: Vec<Level>,
}

/// The ordered, immutable level list.
#[derive(Clone, Debug)]
pub struct LevelSet {
    levels: Vec<Level>,
}

impl LevelSet {
    pub fn builtin() -> LevelResult<Self> {
        Self::from_toml(BUILTIN_LEVELS)
    }

    pub fn load(path: &Path) -> LevelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parses and validates a level list together with the path table.
    pub fn from_toml(text: &str) -> LevelResult<Self> {
        paths::validate()?;
        let file: LevelFile =
            toml::from_str(text).map_err(|e| LevelError::Parse(e.to_string()))?;
        Self::new(file.levels)
    }

    pub fn new(levels: Vec<Level>) -> LevelResult<Self> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i + 1)?;
        }
        info!("loaded {} levels", levels.len());
        Ok(LevelSet { levels })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn resolve(&self, level_no: u32) -> LevelNumber {
        let count = self.levels.len() as u32;
        let n = level_no.max(1) - 1;
        LevelNumber {
            level_no,
            real: n % count + 1,
            meta: n / count + 1,
        }
    }

    /// Level by 1-based cycle position, as returned in `LevelNumber::real`.
    pub fn level(&self, real: u32) -> &Level {
        &self.levels[(real.max(1) - 1) as usize]
    }
}
