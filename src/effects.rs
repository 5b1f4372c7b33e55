//! Short-lived scenery: explosions, falling prizes and the star field.

use log::debug;
use rand::Rng;

use crate::arena::Arena;
use crate::constants::{
    EXPLOSION_FRAMES, MAX_EXPLOSIONS, MAX_STARS, PRIZE_CATCH_RANGE, PRIZE_SPEED, SHIP_HEIGHT,
    STAR_SPEED_CAP,
};
use crate::entities::{Explosion, ExplosionKind, Prize, PrizeKind, Screen, Star};

// ── Explosions ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Explosions {
    pub slots: [Explosion; MAX_EXPLOSIONS],
}

impl Explosions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an explosion in the first idle slot. Dropped when all ten
    /// are busy.
    pub fn spawn(&mut self, x: i32, y: i32, kind: ExplosionKind) -> bool {
        match self.slots.iter_mut().find(|e| !e.running) {
            Some(slot) => {
                *slot = Explosion {
                    x,
                    y,
                    kind,
                    frame: 0,
                    running: true,
                };
                true
            }
            None => {
                debug!("explosion pool full, dropping {:?} at ({}, {})", kind, x, y);
                false
            }
        }
    }

    pub fn update(&mut self) {
        for e in self.slots.iter_mut().filter(|e| e.running) {
            e.frame += 1;
            if e.frame > EXPLOSION_FRAMES {
                e.running = false;
            }
        }
    }

    pub fn running(&self) -> impl Iterator<Item = &Explosion> {
        self.slots.iter().filter(|e| e.running)
    }

    pub fn clear(&mut self) {
        for e in &mut self.slots {
            e.running = false;
        }
    }
}

// ── Prizes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Prizes {
    pool: Arena<Prize>,
}

impl Prizes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, x: i32, y: i32, kind: PrizeKind) {
        self.pool.insert(Prize { x, y, kind });
    }

    /// Drops a prize of random kind.
    pub fn spawn_random(&mut self, x: i32, y: i32, rng: &mut impl Rng) {
        let kind = PrizeKind::ALL[rng.gen_range(0..PrizeKind::ALL.len())];
        self.spawn(x, y, kind);
    }

    /// Drops every prize one step. Returns the kinds caught by a living
    /// player at `player_x`; prizes that fall past the bottom are freed.
    pub fn update(&mut self, screen: Screen, player_x: i32, player_alive: bool) -> Vec<PrizeKind> {
        let mut caught = Vec::new();
        self.pool.retain_mut(|p| {
            p.y += PRIZE_SPEED;
            if p.y > screen.height - SHIP_HEIGHT
                && (p.x - player_x).abs() < PRIZE_CATCH_RANGE
                && player_alive
            {
                caught.push(p.kind);
                return false;
            }
            p.y <= screen.height
        });
        caught
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prize> {
        self.pool.iter().map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    pub fn clear(&mut self) {
        self.pool.reset(None);
    }
}

// ── Star field ────────────────────────────────────────────────────────────────

/// Scrolling background. Its speed doubles as the warp signal between
/// levels: 1 while playing, anything else while the level changes.
#[derive(Clone, Debug)]
pub struct StarField {
    pub stars: Vec<Star>,
    speed: i32,
}

impl StarField {
    pub fn new(screen: Screen, rng: &mut impl Rng) -> Self {
        let stars = (0..MAX_STARS)
            .map(|_| Star {
                x: rng.gen_range(0..screen.width.max(1)),
                y: rng.gen_range(0..screen.height.max(1)),
                speed: rng.gen_range(1..=3),
                color: rng.gen_range(0..4),
            })
            .collect();
        StarField { stars, speed: 1 }
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    pub fn change_speed(&mut self, delta: i32) {
        self.speed += delta;
    }

    pub fn update(&mut self, screen: Screen, rng: &mut impl Rng) {
        let step = self.speed.abs().min(STAR_SPEED_CAP);
        for star in &mut self.stars {
            star.y += star.speed * step;
            if star.y >= screen.height {
                star.x = rng.gen_range(0..screen.width.max(1));
                star.y -= screen.height;
            }
        }
    }
}
