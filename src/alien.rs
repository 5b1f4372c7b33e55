//! One alien and the transitions of its lifecycle.
//!
//! Everything an alien can do without looking at its neighbours lives here:
//! entering along a script, homing onto its formation slot, diving along an
//! attack path and coming back from the bottom of the screen. The swarm
//! decides *when* these happen.

use log::debug;
use rand::Rng;

use crate::constants::{PATH_RETRIES, RETURN_DROP, REENTRY_Y, TURN_SPEED, WRAP_MARGIN};
use crate::entities::{Direction, Screen};
use crate::level::{scale_ticks, Level, LevelNumber};
use crate::paths::{self, PathId, ATTACK_PATHS};

/// Position inside a path script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathCursor {
    pub path: PathId,
    pub pos: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlienState {
    Dead,
    /// Waiting out `delay`, then flying the entry script. With `script`
    /// exhausted the alien homes onto its formation slot.
    Entering {
        delay: u32,
        heading: Direction,
        steer: i32,
        script: Option<PathCursor>,
    },
    InFormation,
    /// Diving. Without a path the alien tumbles, turning one step every
    /// `TURN_SPEED` ticks.
    Attacking {
        heading: Direction,
        steer: i32,
        path: Option<PathCursor>,
    },
    /// Copying a flagship's heading. `heading` stays `None` until the
    /// flagship has left the formation.
    Escorting {
        flagship: usize,
        heading: Option<Direction>,
    },
    /// Flying straight back to the formation slot after losing its flagship.
    Homing { heading: Direction },
    /// Dropping in from above the screen after falling off the bottom.
    Returning,
}

/// What a tick of `Entering` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnterStep {
    Waiting,
    Scripted,
    Homing,
    Arrived,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    /// Slot 0..60; below 10 is a flagship.
    pub id: usize,
    pub shape: u8,
    pub x: f64,
    pub y: f64,
    pub state: AlienState,
}

/// Entry and homing speed multiplier for a difficulty cycle.
fn speed_factor(meta: u32) -> f64 {
    1.0 + meta as f64 / 2.0
}

impl Alien {
    pub fn new(id: usize) -> Self {
        Alien {
            id,
            shape: 0,
            x: 0.0,
            y: 0.0,
            state: AlienState::Dead,
        }
    }

    /// Puts the alien at the start of its entry script for `level`, or
    /// kills it when the level leaves its slot empty.
    pub fn reset(&mut self, level: &Level, number: LevelNumber, screen: Screen) {
        let Some(shape) = level.alien_shape(self.id) else {
            self.state = AlienState::Dead;
            return;
        };
        let entry = level.alien_entry(self.id);
        let path = level.alien_path(self.id);
        let (x, y) = screen.scale(entry.start[0], entry.start[1]);
        let delay = scale_ticks(level.alien_enter_delay(self.id) as i32, number.meta).max(0) as u32;

        self.shape = shape;
        self.x = x;
        self.y = y;
        self.state = match paths::entry(path, 0) {
            Some(step) => AlienState::Entering {
                delay,
                heading: step.direction,
                steer: scale_ticks(step.duration, number.meta),
                script: Some(PathCursor { path, pos: 0 }),
            },
            None => AlienState::Entering {
                delay,
                heading: Direction::S,
                steer: 0,
                script: None,
            },
        };
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn is_alive(&self) -> bool {
        self.state != AlienState::Dead
    }

    pub fn is_entering(&self) -> bool {
        matches!(self.state, AlienState::Entering { .. })
    }

    pub fn in_formation(&self) -> bool {
        self.state == AlienState::InFormation
    }

    pub fn escorting(&self) -> Option<usize> {
        match self.state {
            AlienState::Escorting { flagship, .. } => Some(flagship),
            _ => None,
        }
    }

    /// Current flight direction; `None` while parked in (or dropping back
    /// into) the formation.
    pub fn heading(&self) -> Option<Direction> {
        match self.state {
            AlienState::Entering { heading, .. }
            | AlienState::Attacking { heading, .. }
            | AlienState::Homing { heading } => Some(heading),
            AlienState::Escorting { heading, .. } => heading,
            AlienState::Dead | AlienState::InFormation | AlienState::Returning => None,
        }
    }

    /// Away from the formation. Kills score by this.
    pub fn is_diving(&self) -> bool {
        self.heading().is_some()
    }

    /// Whether the alien counts against the swarm's attack limit.
    pub fn counts_as_attacking(&self) -> bool {
        matches!(
            self.state,
            AlienState::Attacking { .. } | AlienState::Homing { .. }
        )
    }

    // ── Entering ─────────────────────────────────────────────────────────────

    /// One tick of the entry phase. `slot` is the formation position the
    /// alien homes onto once its script runs out.
    pub fn enter(&mut self, slot: (f64, f64), meta: u32) -> EnterStep {
        let AlienState::Entering {
            delay,
            heading,
            mut steer,
            script,
        } = self.state
        else {
            return EnterStep::Waiting;
        };

        if delay > 0 {
            self.state = AlienState::Entering {
                delay: delay - 1,
                heading,
                steer,
                script,
            };
            return EnterStep::Waiting;
        }

        let Some(mut cursor) = script else {
            return match self.home_toward(slot, meta) {
                Some(heading) => {
                    self.state = AlienState::Entering {
                        delay: 0,
                        heading,
                        steer,
                        script: None,
                    };
                    EnterStep::Homing
                }
                None => {
                    self.state = AlienState::InFormation;
                    EnterStep::Arrived
                }
            };
        };

        self.advance(heading, speed_factor(meta));
        steer -= 1;
        let mut next = (heading, Some(cursor));
        if steer <= 0 {
            cursor.pos += 1;
            next = match paths::entry(cursor.path, cursor.pos) {
                Some(step) => {
                    steer = scale_ticks(step.duration, meta);
                    (step.direction, Some(cursor))
                }
                None => (heading, None),
            };
        }
        self.state = AlienState::Entering {
            delay: 0,
            heading: next.0,
            steer,
            script: next.1,
        };
        EnterStep::Scripted
    }

    /// Moves one step toward `slot`, snapping each axis once it is close.
    /// Returns the heading flown, or `None` when the alien has arrived.
    pub fn home_toward(&mut self, (tx, ty): (f64, f64), meta: u32) -> Option<Direction> {
        let threshold = (4 + 2 * meta) as f64;
        let close_x = (tx - self.x).abs() < threshold;
        let heading = if (ty - self.y).abs() < threshold {
            self.y = ty;
            if close_x {
                self.x = tx;
                return None;
            }
            if tx > self.x {
                Direction::E
            } else {
                Direction::W
            }
        } else if ty < self.y {
            if close_x {
                self.x = tx;
                Direction::N
            } else if tx > self.x {
                Direction::NE
            } else {
                Direction::NW
            }
        } else if close_x {
            self.x = tx;
            Direction::S
        } else if tx > self.x {
            Direction::SE
        } else {
            Direction::SW
        };
        self.advance(heading, speed_factor(meta));
        Some(heading)
    }

    /// One tick of the `Homing` state.
    pub fn home(&mut self, slot: (f64, f64), meta: u32) {
        self.state = match self.home_toward(slot, meta) {
            Some(heading) => AlienState::Homing { heading },
            None => AlienState::InFormation,
        };
    }

    // ── Attacking ────────────────────────────────────────────────────────────

    /// Leaves the formation on step 0 of `path`.
    pub fn launch(&mut self, path: PathId) -> bool {
        if self.state != AlienState::InFormation {
            return false;
        }
        let Some(step) = paths::entry(path, 0) else {
            return false;
        };
        self.state = AlienState::Attacking {
            heading: step.direction,
            steer: step.duration,
            path: Some(PathCursor { path, pos: 0 }),
        };
        true
    }

    /// Joins `path` at its first step that keeps the current heading, so
    /// the switch does not show as a snap. Fails when no step matches.
    pub fn start_path(&mut self, path: PathId) -> bool {
        let AlienState::Attacking { heading, .. } = self.state else {
            return false;
        };
        let Some(pos) = paths::find_direction(path, heading) else {
            return false;
        };
        let Some(step) = paths::entry(path, pos) else {
            return false;
        };
        self.state = AlienState::Attacking {
            heading,
            steer: step.duration,
            path: Some(PathCursor { path, pos }),
        };
        true
    }

    /// Picks a random attack maneuver continuing the current heading,
    /// tumbling freely if none is found within `PATH_RETRIES` draws.
    pub fn pick_attack_path(&mut self, rng: &mut impl Rng) {
        for _ in 0..PATH_RETRIES {
            let path = ATTACK_PATHS[rng.gen_range(0..ATTACK_PATHS.len())];
            if self.start_path(path) {
                debug!("alien {} takes path {}", self.id, path);
                return;
            }
        }
        if let AlienState::Attacking { heading, .. } = self.state {
            self.state = AlienState::Attacking {
                heading,
                steer: TURN_SPEED,
                path: None,
            };
        }
    }

    /// Counts down the current path step and moves on when it expires.
    pub fn steer(&mut self, rng: &mut impl Rng) {
        let AlienState::Attacking {
            mut heading,
            mut steer,
            mut path,
        } = self.state
        else {
            return;
        };
        steer -= 1;
        if steer <= 0 {
            match path {
                Some(mut cursor) => {
                    cursor.pos += 1;
                    match paths::entry(cursor.path, cursor.pos) {
                        Some(step) => {
                            heading = step.direction;
                            steer = step.duration;
                            path = Some(cursor);
                        }
                        None => {
                            self.state = AlienState::Attacking {
                                heading,
                                steer: 0,
                                path: None,
                            };
                            self.pick_attack_path(rng);
                            return;
                        }
                    }
                }
                None => {
                    heading = if rng.gen_bool(0.5) {
                        heading.rotate_right()
                    } else {
                        heading.rotate_left()
                    };
                    steer = TURN_SPEED;
                }
            }
        }
        self.state = AlienState::Attacking {
            heading,
            steer,
            path,
        };
    }

    /// Moves a diving alien one step, wrapping across the side edges.
    /// Returns true when it has dropped below the bottom of the screen.
    pub fn dive(&mut self, screen: Screen) -> bool {
        let Some(heading) = self.heading() else {
            return false;
        };
        self.advance(heading, 1.0);

        let right = screen.width as f64 + WRAP_MARGIN;
        if self.x > right {
            self.x = -WRAP_MARGIN;
        } else if self.x < -WRAP_MARGIN {
            self.x = right;
        }

        if self.y > screen.height as f64 {
            return true;
        }
        if self.y < 0.0 {
            self.set_heading(Direction::S);
        }
        false
    }

    fn set_heading(&mut self, new_heading: Direction) {
        match &mut self.state {
            AlienState::Attacking { heading, .. } | AlienState::Homing { heading } => {
                *heading = new_heading
            }
            AlienState::Escorting { heading, .. } => *heading = Some(new_heading),
            _ => {}
        }
    }

    // ── Escorting ────────────────────────────────────────────────────────────

    /// Signs up as an escort of `flagship`; only parked aliens can.
    pub fn join_escort(&mut self, flagship: usize) -> bool {
        if self.state != AlienState::InFormation {
            return false;
        }
        self.state = AlienState::Escorting {
            flagship,
            heading: None,
        };
        true
    }

    /// Reacts to the flagship's state at the start of this alien's turn.
    pub fn follow(&mut self, lead: &AlienState) {
        let AlienState::Escorting { flagship, heading } = self.state else {
            return;
        };
        if *lead == AlienState::Dead {
            self.release();
            return;
        }
        self.state = match *lead {
            AlienState::Attacking {
                heading: lead_heading,
                ..
            }
            | AlienState::Escorting {
                heading: Some(lead_heading),
                ..
            } => AlienState::Escorting {
                flagship,
                heading: Some(lead_heading),
            },
            _ => match heading {
                Some(heading) => AlienState::Homing { heading },
                None => AlienState::InFormation,
            },
        };
    }

    /// Drops the escort duty and keeps flying on its own.
    pub fn release(&mut self) {
        if let AlienState::Escorting { heading, .. } = self.state {
            self.state = match heading {
                Some(heading) => AlienState::Attacking {
                    heading,
                    steer: TURN_SPEED,
                    path: None,
                },
                None => AlienState::InFormation,
            };
        }
    }

    // ── Returning ────────────────────────────────────────────────────────────

    /// Parks the alien above the screen at `x`, ready to drop back in.
    pub fn wrap_to_top(&mut self, x: f64) {
        self.x = x;
        self.y = REENTRY_Y;
        self.state = AlienState::Returning;
    }

    /// One tick of the drop back into the formation, riding the convoy's
    /// sideways `shift` on the way down.
    pub fn descend(&mut self, shift: i32, slot_y: f64) {
        self.x += shift as f64;
        self.y += RETURN_DROP;
        if self.y >= slot_y {
            self.y = slot_y;
            self.state = AlienState::InFormation;
        }
    }

    fn advance(&mut self, heading: Direction, factor: f64) {
        let (dx, dy) = heading.step();
        self.x += dx as f64 * factor;
        self.y += dy as f64 * factor;
    }
}
