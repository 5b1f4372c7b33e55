//! Configuration errors raised while loading level data.
//!
//! All of these are fatal: a level list is validated completely before the
//! first tick, so the simulation can index level tables directly.

use std::fmt;

#[derive(Debug)]
pub enum LevelError {
    /// The level file could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The level file is not valid TOML or does not match the level schema.
    Parse(String),

    /// The file parsed but contained no `[[level]]` tables.
    NoLevels,

    /// A per-slot array does not have exactly one entry per alien slot.
    SlotCount {
        level: usize,
        field: &'static str,
        got: usize,
        expected: usize,
    },

    /// A slot refers to an entry script the level does not define.
    EntryOutOfRange {
        level: usize,
        slot: usize,
        entry: usize,
        available: usize,
    },

    /// An entry script names a path id outside the path table.
    PathOutOfRange {
        level: usize,
        entry: usize,
        path: usize,
    },

    /// A shape is neither −1 (unused slot) nor a valid shape index.
    ShapeOutOfRange {
        level: usize,
        slot: usize,
        shape: i32,
    },

    /// Every slot of the level is unused, so it would be cleared instantly.
    EmptyLevel { level: usize },

    /// A path script has no sentinel within `MAX_PATH` steps.
    Unterminated { path: usize },

    /// A path step has an unknown direction or a zero duration.
    BadStep {
        path: usize,
        step: usize,
        direction: i32,
        duration: i32,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "cannot read level file '{}': {}", path, source)
            }
            LevelError::Parse(msg) => write!(f, "malformed level data: {}", msg),
            LevelError::NoLevels => write!(f, "level data defines no levels"),
            LevelError::SlotCount {
                level,
                field,
                got,
                expected,
            } => write!(
                f,
                "level {}: '{}' has {} entries, expected {}",
                level, field, got, expected
            ),
            LevelError::EntryOutOfRange {
                level,
                slot,
                entry,
                available,
            } => write!(
                f,
                "level {}: slot {} uses entry script {} but only {} are defined",
                level, slot, entry, available
            ),
            LevelError::PathOutOfRange { level, entry, path } => write!(
                f,
                "level {}: entry script {} refers to unknown path {}",
                level, entry, path
            ),
            LevelError::ShapeOutOfRange { level, slot, shape } => write!(
                f,
                "level {}: slot {} has shape {}, expected -1 or 0..=255",
                level, slot, shape
            ),
            LevelError::EmptyLevel { level } => {
                write!(f, "level {} has no aliens", level)
            }
            LevelError::Unterminated { path } => {
                write!(f, "path {} has no terminator within its step limit", path)
            }
            LevelError::BadStep {
                path,
                step,
                direction,
                duration,
            } => write!(
                f,
                "path {} step {}: invalid step ({}, {})",
                path, step, direction, duration
            ),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type LevelResult<T> = Result<T, LevelError>;
