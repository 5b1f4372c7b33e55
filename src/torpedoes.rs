//! Torpedo pools: the swarm's bounded arena and the player's fixed slots.

use rand::Rng;

use crate::arena::Arena;
use crate::constants::{
    ALIEN_TORPS_PER_LEVEL, BASE_ALIEN_TORPS, ETORP_SPEED, HIT_RANGE, MAX_TORPS,
    MIN_TORP_CHANCE, TORP_CHANCE,
};
use crate::entities::{AlienTorpedo, PlayerTorpedo, Screen, Weapon};

/// What the swarm may know about the player during its update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTarget {
    pub x: i32,
    /// Vertical centre of the ship.
    pub y: i32,
    pub weapon: Weapon,
    /// Alive and neither flashing nor shielded.
    pub vulnerable: bool,
}

// ── Alien torpedoes ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AlienTorpedoes {
    pool: Arena<AlienTorpedo>,
    level_no: u32,
}

impl Default for AlienTorpedoes {
    fn default() -> Self {
        Self::new(1)
    }
}

impl AlienTorpedoes {
    pub fn new(level_no: u32) -> Self {
        AlienTorpedoes {
            pool: Arena::bounded(Self::capacity_for(level_no)),
            level_no,
        }
    }

    pub fn capacity_for(level_no: u32) -> usize {
        BASE_ALIEN_TORPS + level_no as usize * ALIEN_TORPS_PER_LEVEL
    }

    /// Drops every torpedo in flight and resizes the pool for `level_no`.
    pub fn init(&mut self, level_no: u32) {
        self.level_no = level_no;
        self.pool.reset(Some(Self::capacity_for(level_no)));
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn max(&self) -> usize {
        self.pool.capacity().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlienTorpedo> {
        self.pool.iter().map(|(_, t)| t)
    }

    pub fn arena(&self) -> &Arena<AlienTorpedo> {
        &self.pool
    }

    /// One-in-`chance` odds per eligible alien per tick; better weapons draw
    /// more fire.
    pub fn chance(&self, weapon: Weapon) -> i32 {
        (TORP_CHANCE - self.level_no as i32 / 2 - weapon.tier() * 5).max(MIN_TORP_CHANCE)
    }

    /// Horizontal speed that leads the shot toward the player.
    pub fn aim(alien_x: i32, player_x: i32) -> i32 {
        if alien_x > player_x + 200 {
            -3
        } else if alien_x > player_x + 100 {
            -2
        } else if alien_x < player_x - 200 {
            3
        } else if alien_x < player_x - 100 {
            2
        } else {
            0
        }
    }

    /// Rolls for a shot from an alien at (`x`, `y`).
    pub fn consider(&mut self, x: f64, y: f64, target: &PlayerTarget, rng: &mut impl Rng) -> bool {
        if self.pool.is_full() || rng.gen_range(0..self.chance(target.weapon)) != 0 {
            return false;
        }
        self.spawn(x as i32, y as i32, target.x)
    }

    /// Launches a torpedo aimed at `player_x`; false when the pool is full.
    pub fn spawn(&mut self, x: i32, y: i32, player_x: i32) -> bool {
        let x_speed = Self::aim(x, player_x);
        let torpedo = AlienTorpedo {
            x,
            y,
            x_speed,
            y_speed: ETORP_SPEED + self.level_no as i32 / 5 - x_speed.abs(),
            frame: 0,
        };
        self.pool.insert(torpedo).is_some()
    }

    /// Moves every torpedo, frees those that left the screen and reports
    /// whether one of them reached a vulnerable player.
    pub fn update(&mut self, screen: Screen, target: &PlayerTarget) -> bool {
        let mut hit = false;
        self.pool.retain_mut(|t| {
            t.x += t.x_speed;
            t.y += t.y_speed;
            t.frame += 1;
            if t.y > screen.height || t.x < 0 || t.x > screen.width {
                return false;
            }
            if !hit
                && target.vulnerable
                && (t.x - target.x).abs() < HIT_RANGE
                && (t.y - target.y).abs() < HIT_RANGE
            {
                hit = true;
            }
            true
        });
        hit
    }
}

// ── Player torpedoes ──────────────────────────────────────────────────────────

/// `MAX_TORPS` slots; only the first `limit` of them are usable, where the
/// limit is the player's current torpedo capacity.
#[derive(Clone, Debug, Default)]
pub struct PlayerTorpedoes {
    pub slots: [PlayerTorpedo; MAX_TORPS],
}

impl PlayerTorpedoes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.slots.iter().filter(|t| t.alive).count()
    }

    pub fn live(&self) -> impl Iterator<Item = &PlayerTorpedo> {
        self.slots.iter().filter(|t| t.alive)
    }

    /// Takes the first free slot below `limit`.
    pub fn fire(&mut self, limit: usize, x: i32, y: i32, x_speed: i32, y_speed: i32) -> bool {
        let Some(slot) = self.slots.iter_mut().take(limit).find(|t| !t.alive) else {
            return false;
        };
        *slot = PlayerTorpedo {
            x,
            y,
            x_speed,
            y_speed,
            alive: true,
            frame: 0,
        };
        true
    }

    pub fn kill(&mut self, index: usize) {
        if let Some(t) = self.slots.get_mut(index) {
            t.alive = false;
        }
    }

    pub fn clear(&mut self) {
        for t in &mut self.slots {
            t.alive = false;
        }
    }

    /// Moves one torpedo; it dies once it leaves the top or sides, with its
    /// own horizontal speed as the margin.
    pub fn advance(&mut self, index: usize, screen: Screen) {
        let Some(t) = self.slots.get_mut(index) else {
            return;
        };
        t.x += t.x_speed;
        t.y += t.y_speed;
        t.frame += 1;
        let margin = t.x_speed.abs();
        if t.y < -margin || t.x < margin || t.x > screen.width - margin {
            t.alive = false;
        }
    }
}
