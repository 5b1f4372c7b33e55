//! The immutable path table: every scripted maneuver an alien can fly.
//!
//! A script is a list of `(direction, duration)` steps closed by the
//! sentinel `(-1, -1)`. Ids 0..=9 are attack maneuvers, 10..=29 are the
//! entry scripts used while a level's aliens fly onto the screen.

use crate::constants::MAX_PATH;
use crate::entities::Direction;
use crate::error::{LevelError, LevelResult};

pub type PathId = usize;

pub const PEEL_LEFT: PathId = 0;
pub const PEEL_RIGHT: PathId = 1;
pub const LOOP: PathId = 2;
pub const SWOOP1: PathId = 3;
pub const SWOOP2: PathId = 4;
pub const ZIGZAG: PathId = 5;
pub const LOOP2: PathId = 6;
pub const SPIN: PathId = 7;
pub const LEFT_DIAG: PathId = 8;
pub const RIGHT_DIAG: PathId = 9;
/// First entry script; entry scripts run up to `NUM_PATHS - 1`.
pub const ENTER1: PathId = 10;
pub const NUM_PATHS: usize = 30;

/// Maneuvers picked at random once an attack script runs out.
pub const ATTACK_PATHS: [PathId; 8] = [
    LOOP, SWOOP1, SWOOP2, ZIGZAG, LOOP2, SPIN, LEFT_DIAG, RIGHT_DIAG,
];

const END: (i8, i16) = (-1, -1);

#[rustfmt::skip]
static PATHS: [&[(i8, i16)]; NUM_PATHS] = [
    // peel left
    &[(0, 3), (15, 3), (14, 3), (13, 3), (12, 3), (11, 3), (10, 3), (9, 3), (8, 3), END],
    // peel right
    &[(0, 3), (1, 3), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3), (7, 3), (8, 3), END],
    // loop
    &[(8, 2), (9, 2), (10, 2), (11, 2), (12, 2), (13, 2), (14, 2), (15, 2), (0, 2),
      (1, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 2), (7, 2), (8, 2), END],
    // swoop 1
    &[(8, 20), (9, 3), (10, 3), (11, 3), (12, 3), END],
    // swoop 2
    &[(8, 20), (7, 3), (6, 3), (5, 3), (4, 3), END],
    // zigzag
    &[(7, 15), (8, 2), (9, 15), (8, 2), (7, 15), (8, 2), (9, 15), (8, 2), END],
    // loop 2
    &[(8, 2), (7, 2), (6, 2), (5, 2), (4, 2), (3, 2), (2, 2), (1, 2), (0, 2),
      (15, 2), (14, 2), (13, 2), (12, 2), (11, 2), (10, 2), (9, 2), (8, 2), END],
    // spin
    &[(8, 1), (7, 1), (6, 1), (5, 1), (4, 1), (3, 1), (2, 1), (1, 1), (0, 1),
      (15, 1), (14, 1), (13, 1), (12, 1), (11, 1), (10, 1), (9, 1), (8, 1), END],
    // left diagonal
    &[(8, 2), (9, 2), (10, 30), (9, 2), (8, 1), END],
    // right diagonal
    &[(8, 2), (7, 2), (6, 30), (7, 2), (8, 1), END],

    // ── entry scripts ──
    &[(8, 65), (9, 5), (10, 5), (11, 5), (12, 5), (13, 5), (14, 20), END],
    &[(8, 65), (7, 5), (6, 5), (5, 5), (4, 5), (3, 5), (2, 20), END],
    &[END],
    &[(10, 45), (11, 5), (12, 20), (13, 5), (14, 10), END],
    &[(6, 45), (5, 5), (4, 20), (3, 5), (2, 10), END],
    &[(8, 80), (6, 10), (4, 40), (0, 20), (14, 30), END],
    &[(8, 80), (10, 10), (12, 40), (0, 20), (2, 30), END],
    &[(0, 50), (2, 50), (3, 5), (4, 5), (5, 5), (6, 5), (7, 5), (8, 5), (9, 5), (10, 5),
      (11, 5), (12, 30), (13, 5), (14, 5), (15, 5), (0, 5), END],
    &[(0, 50), (14, 50), (13, 5), (12, 5), (11, 5), (10, 5), (9, 5), (8, 5), (7, 5), (6, 5),
      (5, 5), (4, 30), (3, 5), (2, 5), (1, 5), (0, 5), END],
    &[(4, 80), (10, 30), (0, 70), END],
    &[(12, 80), (6, 30), (0, 70), END],
    &[(14, 80), END],
    &[(2, 80), END],
    &[(4, 8), (3, 6), (2, 8), (1, 10), (2, 8), (3, 6), (4, 4), (5, 6), (6, 8), (7, 10),
      (6, 8), (5, 6), (4, 4), (3, 6), (2, 8), (1, 10), (0, 20), END],
    &[(12, 60), (11, 3), (10, 3), (9, 3), (8, 3), (7, 3), (6, 3), (5, 3), (4, 3), (3, 3),
      (2, 3), (1, 3), (0, 3), (15, 3), (14, 3), (13, 3), (12, 3), (11, 3), (10, 3), (9, 3),
      (8, 3), (7, 3), (6, 3), (5, 3), (4, 3), (3, 3), (2, 3), (1, 3), (0, 3), (15, 3),
      (14, 3), (13, 3), (12, 3), (11, 3), (10, 3), (9, 3), (8, 3), (7, 3), (6, 3), (5, 3),
      (4, 3), (3, 3), (2, 3), (1, 3), (0, 20), END],
    &[(4, 60), (5, 3), (6, 3), (7, 3), (8, 3), (9, 3), (10, 3), (11, 3), (12, 3), (13, 3),
      (14, 3), (15, 3), (0, 3), (1, 3), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3), (7, 3),
      (8, 3), (9, 3), (10, 3), (11, 3), (12, 3), (13, 3), (14, 3), (15, 3), (0, 3), (1, 3),
      (2, 3), (3, 3), (4, 3), (5, 3), (6, 3), (7, 3), (8, 3), (9, 3), (10, 3), (11, 3),
      (12, 3), (13, 3), (14, 3), (15, 3), (0, 20), END],
    &[(7, 15), (8, 3), (9, 15), (8, 3), (7, 15), (8, 3), (9, 15), (8, 3), (7, 15), (8, 3),
      (9, 15), (8, 3), END],
    &[(12, 60), (4, 30), (12, 30), (4, 30), (12, 30), (8, 20), END],
    &[(10, 80), END],
    &[(6, 80), END],
];

/// One decoded step of a path script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStep {
    pub direction: Direction,
    pub duration: i32,
}

/// Raw steps of a script including its sentinel; empty for unknown ids.
pub fn raw_steps(path: PathId) -> &'static [(i8, i16)] {
    PATHS.get(path).copied().unwrap_or(&[])
}

/// Step `step` of `path`, or `None` at or past the sentinel.
pub fn entry(path: PathId, step: usize) -> Option<PathStep> {
    let &(direction, duration) = raw_steps(path).get(step)?;
    Some(PathStep {
        direction: Direction::from_index(direction as i32)?,
        duration: duration as i32,
    })
}

/// Index of the first step of `path` flying `direction`.
pub fn find_direction(path: PathId, direction: Direction) -> Option<usize> {
    raw_steps(path)
        .iter()
        .map_while(|&(d, _)| Direction::from_index(d as i32))
        .position(|d| d == direction)
}

/// Checks that every script is made of valid steps and ends with the
/// sentinel within `MAX_PATH` entries.
pub fn validate() -> LevelResult<()> {
    for (path, steps) in PATHS.iter().enumerate() {
        let end = steps
            .iter()
            .take(MAX_PATH)
            .position(|&step| step == END)
            .ok_or(LevelError::Unterminated { path })?;
        for (step, &(direction, duration)) in steps[..end].iter().enumerate() {
            if Direction::from_index(direction as i32).is_none() || duration <= 0 {
                return Err(LevelError::BadStep {
                    path,
                    step,
                    direction: direction as i32,
                    duration: duration as i32,
                });
            }
        }
    }
    Ok(())
}
