//! The alien swarm: formation, convoy drift, attack waves and escorts.
//!
//! The swarm owns every alien and the alien torpedo pool. Each tick it
//! moves the convoy, takes a `SwarmStats` snapshot, walks the aliens in
//! slot order and finally moves the torpedoes. Slot order matters: a
//! flagship (ids 0..10) is always processed before its escorts
//! (ids `flagship + 9 ..= flagship + 11`), so escorts see this tick's
//! flagship state.

use std::ops::Range;

use log::{debug, info};
use rand::Rng;

use crate::alien::{Alien, AlienState, EnterStep};
use crate::constants::{
    CONVOY_SPAN, ESCORTS, ESCORT_OFFSET, FLAGSHIPS, HIT_RANGE, MAX_ALIENS, MAX_ATTACKING_CAP,
    SLOTS_PER_ROW, SLOT_SPACING,
};
use crate::entities::Screen;
use crate::level::{LevelNumber, LevelSet};
use crate::paths::{PEEL_LEFT, PEEL_RIGHT};
use crate::torpedoes::{AlienTorpedoes, PlayerTarget};

// ── Aggregate counts ──────────────────────────────────────────────────────────

/// Swarm totals, recounted once per tick. Between recounts they change only
/// through the `on_*` hooks; every state change inside the swarm pass goes
/// through `Swarm::transition`, which calls the matching hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwarmStats {
    pub live: u32,
    /// Diving on their own (escorts not included).
    pub attacking: u32,
    pub entering: u32,
}

impl SwarmStats {
    pub fn scan(aliens: &[Alien]) -> Self {
        aliens
            .iter()
            .filter(|a| a.is_alive())
            .fold(SwarmStats::default(), |mut stats, a| {
                stats.live += 1;
                if a.counts_as_attacking() {
                    stats.attacking += 1;
                }
                if a.is_entering() {
                    stats.entering += 1;
                }
                stats
            })
    }

    pub fn on_launched(&mut self) {
        self.attacking += 1;
    }

    pub fn on_returned(&mut self) {
        self.attacking = self.attacking.saturating_sub(1);
    }

    /// An alien finished its entry script or its homing run into the slot.
    pub fn on_arrived(&mut self) {
        self.entering = self.entering.saturating_sub(1);
    }

    pub fn on_destroyed(&mut self, was_attacking: bool) {
        self.live = self.live.saturating_sub(1);
        if was_attacking {
            self.attacking = self.attacking.saturating_sub(1);
        }
    }
}

// ── Swarm ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Swarm {
    pub aliens: Vec<Alien>,
    pub torpedoes: AlienTorpedoes,
    /// Left edge of the formation.
    pub convoy_x: i32,
    /// Convoy drift per tick, ±1.
    pub convoy_move: i32,
    /// How far the convoy actually moved this tick; parked aliens follow it.
    pub convoy_shift: i32,
    pub max_attacking: u32,
    pub level: LevelNumber,
    pub stats: SwarmStats,
}

impl Default for Swarm {
    fn default() -> Self {
        Self::new()
    }
}

impl Swarm {
    /// An empty swarm: every slot dead, convoy at the left edge.
    pub fn new() -> Self {
        Swarm {
            aliens: (0..MAX_ALIENS).map(Alien::new).collect(),
            torpedoes: AlienTorpedoes::new(1),
            convoy_x: 0,
            convoy_move: 1,
            convoy_shift: 0,
            max_attacking: Self::max_attacking_for(1),
            level: LevelNumber {
                level_no: 1,
                real: 1,
                meta: 1,
            },
            stats: SwarmStats::default(),
        }
    }

    pub fn max_attacking_for(level_no: u32) -> u32 {
        (1 + level_no * 2).min(MAX_ATTACKING_CAP)
    }

    /// Resets every slot for `level_no`.
    pub fn init(&mut self, level_no: u32, levels: &LevelSet, screen: Screen) {
        let number = levels.resolve(level_no);
        let level = levels.level(number.real);
        for alien in &mut self.aliens {
            alien.reset(level, number, screen);
        }
        self.convoy_x = 0;
        self.convoy_move = 1;
        self.convoy_shift = 0;
        self.level = number;
        self.max_attacking = Self::max_attacking_for(level_no);
        self.torpedoes.init(level_no);
        self.stats = SwarmStats::scan(&self.aliens);
        info!(
            "level {} ('{}', cycle {}): {} aliens, {} may attack at once",
            level_no, level.name, number.meta, self.stats.live, self.max_attacking
        );
    }

    pub fn live_count(&self) -> u32 {
        self.stats.live
    }

    pub fn convoy_x_pos(&self, id: usize) -> f64 {
        (self.convoy_x + SLOT_SPACING * (id % SLOTS_PER_ROW) as i32) as f64
    }

    pub fn convoy_y_pos(id: usize) -> f64 {
        (SLOT_SPACING + SLOT_SPACING * (id / SLOTS_PER_ROW) as i32) as f64
    }

    fn slot(&self, id: usize) -> (f64, f64) {
        (self.convoy_x_pos(id), Self::convoy_y_pos(id))
    }

    /// Slots that may escort `flagship`.
    pub fn escorts_of(flagship: usize) -> Range<usize> {
        let start = (flagship + ESCORT_OFFSET).min(MAX_ALIENS);
        start..(start + ESCORTS).min(MAX_ALIENS)
    }

    pub fn escort_count(&self, flagship: usize) -> usize {
        Self::escorts_of(flagship)
            .filter(|&e| self.aliens[e].escorting() == Some(flagship))
            .count()
    }

    // ── Per tick ─────────────────────────────────────────────────────────────

    /// Advances the whole swarm one tick. Returns true if an alien torpedo
    /// reached the player.
    pub fn update(&mut self, screen: Screen, target: &PlayerTarget, rng: &mut impl Rng) -> bool {
        self.advance_convoy(screen);
        self.stats = SwarmStats::scan(&self.aliens);
        for id in 0..MAX_ALIENS {
            if self.aliens[id].is_alive() {
                self.update_alien(id, screen, target, rng);
            }
        }
        self.torpedoes.update(screen, target)
    }

    /// Slides the formation sideways, bouncing inside
    /// `[0, width - CONVOY_SPAN]`.
    pub fn advance_convoy(&mut self, screen: Screen) {
        let right = (screen.width - CONVOY_SPAN).max(0);
        let before = self.convoy_x;
        self.convoy_x += self.convoy_move;
        if self.convoy_x <= 0 {
            self.convoy_x = 0;
            self.convoy_move = self.convoy_move.abs();
        } else if self.convoy_x >= right {
            self.convoy_x = right;
            self.convoy_move = -self.convoy_move.abs();
        }
        self.convoy_shift = self.convoy_x - before;
    }

    fn update_alien(&mut self, id: usize, screen: Screen, target: &PlayerTarget, rng: &mut impl Rng) {
        if let Some(flagship) = self.aliens[id].escorting() {
            let lead = self.aliens[flagship].state;
            self.transition(id, |alien| alien.follow(&lead));
        }

        let meta = self.level.meta;
        let shift = self.convoy_shift;
        let slot = self.slot(id);
        match self.aliens[id].state {
            AlienState::Dead => {}
            AlienState::Entering { .. } => {
                if self.transition(id, |alien| alien.enter(slot, meta)) == EnterStep::Scripted {
                    self.consider_fire(id, target, rng);
                }
            }
            AlienState::InFormation | AlienState::Escorting { heading: None, .. } => {
                self.aliens[id].x += shift as f64;
                self.consider_launch(id, rng);
            }
            AlienState::Returning => self.transition(id, |alien| alien.descend(shift, slot.1)),
            AlienState::Homing { .. } => self.transition(id, |alien| alien.home(slot, meta)),
            AlienState::Attacking { .. } | AlienState::Escorting { .. } => {
                let escorting = self.aliens[id].escorting().is_some();
                if self.aliens[id].dive(screen) {
                    self.fall_off(id);
                    return;
                }
                if !escorting {
                    self.aliens[id].steer(rng);
                    self.consider_fire(id, target, rng);
                }
            }
        }
    }

    /// Applies one state change to alien `id` and moves `stats` with it, so
    /// later slots in the same pass see the real attacker count.
    fn transition<R>(&mut self, id: usize, change: impl FnOnce(&mut Alien) -> R) -> R {
        let alien = &mut self.aliens[id];
        let (was_attacking, was_entering) = (alien.counts_as_attacking(), alien.is_entering());
        let result = change(&mut *alien);
        let (attacking, entering) = (alien.counts_as_attacking(), alien.is_entering());
        match (was_attacking, attacking) {
            (false, true) => self.stats.on_launched(),
            (true, false) => self.stats.on_returned(),
            _ => {}
        }
        if was_entering && !entering {
            self.stats.on_arrived();
        }
        result
    }

    /// Decides whether a parked alien peels off this tick. Gated on no
    /// alien still entering and the attack limit; once the swarm is small
    /// every parked alien goes.
    fn consider_launch(&mut self, id: usize, rng: &mut impl Rng) {
        if !self.aliens[id].in_formation() {
            return;
        }
        let stats = self.stats;
        if stats.entering > 0 || stats.attacking >= self.max_attacking {
            return;
        }
        if stats.live >= self.max_attacking {
            let odds = self.level.level_no as i64 + 2 * (48 - stats.live as i64);
            if rng.gen_range(0..10000i64) >= odds {
                return;
            }
        }

        let path = if rng.gen_bool(0.5) {
            PEEL_LEFT
        } else {
            PEEL_RIGHT
        };
        if !self.transition(id, |alien| alien.launch(path)) {
            return;
        }
        debug!("alien {} launches on path {}", id, path);

        if id < FLAGSHIPS {
            for e in Self::escorts_of(id) {
                if self.aliens[e].join_escort(id) {
                    debug!("alien {} escorts flagship {}", e, id);
                }
            }
        }
    }

    fn consider_fire(&mut self, id: usize, target: &PlayerTarget, rng: &mut impl Rng) {
        let (x, y) = (self.aliens[id].x, self.aliens[id].y);
        self.torpedoes.consider(x, y, target, rng);
    }

    /// An alien dropped below the screen: park it above its slot column so
    /// it falls back into place, and free a flagship's escorts.
    fn fall_off(&mut self, id: usize) {
        let x = self.convoy_x_pos(id);
        self.transition(id, |alien| alien.wrap_to_top(x));
        if id < FLAGSHIPS {
            for e in Self::escorts_of(id) {
                if self.aliens[e].escorting() == Some(id) {
                    self.transition(e, Alien::release);
                }
            }
        }
    }

    // ── Collisions ───────────────────────────────────────────────────────────

    /// First live alien hit by a torpedo at (`x`, `y`). The half-step ahead
    /// is tested too so fast torpedoes cannot tunnel through.
    pub fn hit_test(&self, x: i32, y: i32, y_speed: i32) -> Option<usize> {
        let range = HIT_RANGE as f64;
        let (x, y) = (x as f64, y as f64);
        let ahead = y + y_speed as f64 / 2.0;
        self.aliens.iter().position(|a| {
            a.is_alive()
                && (x - a.x).abs() < range
                && ((y - a.y).abs() < range || (ahead - a.y).abs() < range)
        })
    }

    pub fn destroy(&mut self, id: usize) -> bool {
        let Some(alien) = self.aliens.get_mut(id) else {
            return false;
        };
        if !alien.is_alive() {
            return false;
        }
        let was_attacking = alien.counts_as_attacking();
        alien.state = AlienState::Dead;
        self.stats.on_destroyed(was_attacking);
        true
    }
}
