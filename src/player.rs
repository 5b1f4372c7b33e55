//! The player's ship: movement, weapons, collisions and lives.

use log::info;
use rand::Rng;

use crate::audio::{self, Audio};
use crate::constants::{
    DOUBLE_SHOT_SPREAD, EDGE_MARGIN, FAR_RIGHT, FLAGSHIPS, FLAGSHIP_BONUS, FLASH_TICKS,
    FORMATION_ESCORT_SCORE, FORMATION_FLAGSHIP_SCORE, LEMON_PRIZE_CHANCE, MAX_SPEED, MAX_TORPS,
    MIN_SPEED, MIN_TORPS, PRIZE_CHANCE, RESPAWN_DELAY, SHIELD_TICKS, SHIP_HEIGHT, START_SHIPS,
    TORP_DELAY, TORP_SPEED, TRIPLE_SHOT_DRIFT,
};
use crate::effects::{Explosions, Prizes};
use crate::entities::{ExplosionKind, PrizeKind, Screen, Weapon};
use crate::swarm::Swarm;
use crate::torpedoes::{PlayerTarget, PlayerTorpedoes};

/// Life-cycle changes reported by `Player::update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
    Respawned,
    /// Reported once, on the tick the last ship's respawn timer runs out.
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    /// Where the ship is heading; set by the move intents.
    pub mx: i32,
    pub move_speed: i32,
    pub weapon: Weapon,
    /// Torpedo slots currently usable, `MIN_TORPS..=MAX_TORPS`.
    pub max_torps: usize,
    /// Fire cooldown; shots are allowed once it drops to zero.
    pub torp_ok: i32,
    /// Spare ships.
    pub ships: u32,
    pub score: u32,
    pub alive: bool,
    /// Ticks since the ship was destroyed.
    pub dead_time: u32,
    /// Post-respawn invulnerability, in ticks.
    pub flashing: u32,
    pub shield: u32,
    pub firing: bool,
    pub got_lemon: bool,
    pub game_over: bool,
    pub frame: u32,
    pub torps: PlayerTorpedoes,
}

impl Player {
    pub fn new(screen: Screen) -> Self {
        let mut player = Player {
            x: 0,
            y: 0,
            mx: 0,
            move_speed: MIN_SPEED,
            weapon: Weapon::Single,
            max_torps: MIN_TORPS,
            torp_ok: 0,
            ships: START_SHIPS,
            score: 0,
            alive: true,
            dead_time: 0,
            flashing: 0,
            shield: 0,
            firing: false,
            got_lemon: false,
            game_over: false,
            frame: 0,
            torps: PlayerTorpedoes::new(),
        };
        player.reset(screen);
        player
    }

    /// Fresh ship for a new game.
    pub fn reset(&mut self, screen: Screen) {
        self.x = screen.width / 2;
        self.mx = self.x;
        self.y = screen.height - SHIP_HEIGHT / 2;
        self.move_speed = MIN_SPEED;
        self.weapon = Weapon::Single;
        self.max_torps = MIN_TORPS;
        self.torp_ok = 0;
        self.ships = START_SHIPS;
        self.score = 0;
        self.alive = true;
        self.dead_time = 0;
        self.flashing = 0;
        self.shield = 0;
        self.firing = false;
        self.got_lemon = false;
        self.game_over = false;
        self.torps.clear();
    }

    pub fn next_level(&mut self) {
        self.torps.clear();
        self.got_lemon = false;
    }

    pub fn is_vulnerable(&self) -> bool {
        self.alive && self.flashing == 0 && self.shield == 0
    }

    pub fn target(&self) -> PlayerTarget {
        PlayerTarget {
            x: self.x,
            y: self.y,
            weapon: self.weapon,
            vulnerable: self.is_vulnerable(),
        }
    }

    // ── Intents ──────────────────────────────────────────────────────────────

    pub fn start_move_left(&mut self) {
        self.mx = 0;
    }

    pub fn stop_move_left(&mut self) {
        self.mx = self.mx.max(self.x);
    }

    pub fn start_move_right(&mut self) {
        self.mx = FAR_RIGHT;
    }

    pub fn stop_move_right(&mut self) {
        self.mx = self.mx.min(self.x);
    }

    pub fn start_fire(&mut self) {
        self.firing = true;
    }

    pub fn stop_fire(&mut self) {
        self.firing = false;
    }

    // ── Upgrades ─────────────────────────────────────────────────────────────

    pub fn add_torp(&mut self) {
        self.max_torps = (self.max_torps + 1).min(MAX_TORPS);
    }

    pub fn inc_speed(&mut self) {
        self.move_speed = (self.move_speed + 1).min(MAX_SPEED);
    }

    pub fn collect(&mut self, kind: PrizeKind) {
        let equip = |player: &mut Player, weapon: Weapon| {
            if player.weapon == weapon {
                player.add_torp();
            } else {
                player.weapon = weapon;
            }
        };
        match kind {
            PrizeKind::SingleShot => equip(self, Weapon::Single),
            PrizeKind::DoubleShot => equip(self, Weapon::Double),
            PrizeKind::TripleShot => equip(self, Weapon::Triple),
            PrizeKind::Speed => self.inc_speed(),
            PrizeKind::Shield => self.shield = SHIELD_TICKS,
            PrizeKind::Lemon => self.got_lemon = true,
        }
    }

    // ── Per tick ─────────────────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        screen: Screen,
        star_speed: i32,
        swarm: &mut Swarm,
        explosions: &mut Explosions,
        prizes: &mut Prizes,
        audio: &mut dyn Audio,
        rng: &mut impl Rng,
    ) -> Option<PlayerEvent> {
        if self.game_over {
            return None;
        }

        if self.alive {
            self.flashing = self.flashing.saturating_sub(1);
            self.shield = self.shield.saturating_sub(1);
            self.steer(screen);
            self.frame += 1;
            self.torp_ok -= 1;
            if self.firing {
                self.fire(screen, star_speed, audio);
            }
        }

        self.update_torpedoes(screen, swarm, explosions, prizes, audio, rng);

        if self.alive {
            None
        } else {
            self.count_down(screen)
        }
    }

    /// Eases toward `mx` by `move_speed` and keeps the ship on screen.
    fn steer(&mut self, screen: Screen) {
        let speed = self.move_speed.max(1);
        if self.mx / speed > self.x / speed {
            self.x += speed;
        } else if self.mx / speed < self.x / speed {
            self.x -= speed;
        }
        self.y = screen.height - SHIP_HEIGHT / 2;
        self.x = self.x.clamp(EDGE_MARGIN, screen.width - EDGE_MARGIN);
    }

    /// Fires the current weapon pattern. The cooldown restarts even when
    /// there were not enough free slots for the whole pattern. No shots
    /// while the star field is warping.
    pub fn fire(&mut self, screen: Screen, star_speed: i32, audio: &mut dyn Audio) {
        if self.torp_ok > 0 || star_speed != 1 {
            return;
        }
        let y = screen.height - SHIP_HEIGHT;
        let used = self.torps.count();
        let limit = self.max_torps;
        let x = self.x;
        let fired = match self.weapon {
            Weapon::Single if used < limit => self.torps.fire(limit, x, y, 0, -TORP_SPEED),
            Weapon::Double if used + 1 < limit => {
                self.torps.fire(limit, x - DOUBLE_SHOT_SPREAD, y, 0, -TORP_SPEED);
                self.torps.fire(limit, x + DOUBLE_SHOT_SPREAD, y, 0, -TORP_SPEED)
            }
            Weapon::Triple if used + 2 < limit => {
                self.torps.fire(
                    limit,
                    x - DOUBLE_SHOT_SPREAD,
                    y,
                    -TRIPLE_SHOT_DRIFT,
                    1 - TORP_SPEED,
                );
                self.torps.fire(limit, x, y, 0, -TORP_SPEED);
                self.torps.fire(
                    limit,
                    x + DOUBLE_SHOT_SPREAD,
                    y,
                    TRIPLE_SHOT_DRIFT,
                    1 - TORP_SPEED,
                )
            }
            _ => false,
        };
        if fired {
            audio.play_sound(audio::FIRE_TORP);
        }
        self.torp_ok = TORP_DELAY;
    }

    /// Tests each torpedo against the swarm, then moves the ones that
    /// missed. A torpedo brings down at most one alien.
    fn update_torpedoes(
        &mut self,
        screen: Screen,
        swarm: &mut Swarm,
        explosions: &mut Explosions,
        prizes: &mut Prizes,
        audio: &mut dyn Audio,
        rng: &mut impl Rng,
    ) {
        for i in 0..MAX_TORPS {
            let torp = &self.torps.slots[i];
            if !torp.alive {
                continue;
            }
            match swarm.hit_test(torp.x, torp.y, torp.y_speed) {
                Some(id) => {
                    self.torps.kill(i);
                    self.score_kill(id, swarm, explosions, prizes, rng);
                    audio.play_sound(audio::ALIEN_EXPLODE);
                }
                None => self.torps.advance(i, screen),
            }
        }
    }

    /// Scores alien `id`, destroys it and leaves an explosion behind.
    pub fn score_kill(
        &mut self,
        id: usize,
        swarm: &mut Swarm,
        explosions: &mut Explosions,
        prizes: &mut Prizes,
        rng: &mut impl Rng,
    ) {
        let alien = &swarm.aliens[id];
        let diving = alien.is_diving();
        let (x, y) = (alien.x as i32, alien.y as i32);

        let (points, kind) = if id >= FLAGSHIPS {
            let points = if diving {
                (6 - (id / 10) as u32) * 100
            } else {
                FORMATION_ESCORT_SCORE
            };
            if diving {
                let chance = if self.got_lemon {
                    LEMON_PRIZE_CHANCE
                } else {
                    PRIZE_CHANCE
                };
                if rng.gen_range(0..chance) == 0 {
                    prizes.spawn_random(x, y, rng);
                }
            }
            (points, ExplosionKind::Alien)
        } else {
            let points = if diving {
                FLAGSHIP_BONUS[swarm.escort_count(id).min(FLAGSHIP_BONUS.len() - 1)]
            } else {
                FORMATION_FLAGSHIP_SCORE
            };
            (points, ExplosionKind::Flagship)
        };

        swarm.destroy(id);
        explosions.spawn(x, y, kind);
        self.score += points;
    }

    /// Blows up the ship. Does nothing if it is already down.
    pub fn destroy(&mut self, explosions: &mut Explosions) -> bool {
        if !self.alive {
            return false;
        }
        explosions.spawn(self.x, self.y, ExplosionKind::Player);
        self.alive = false;
        self.dead_time = 0;
        self.firing = false;
        self.mx = self.x;
        info!("player destroyed, {} ships left, score {}", self.ships, self.score);
        true
    }

    fn count_down(&mut self, screen: Screen) -> Option<PlayerEvent> {
        self.dead_time += 1;
        if self.dead_time < RESPAWN_DELAY {
            return None;
        }
        if self.ships == 0 {
            self.game_over = true;
            info!("game over with score {}", self.score);
            return Some(PlayerEvent::GameOver);
        }
        self.ships -= 1;
        self.weapon = Weapon::Single;
        self.max_torps = MIN_TORPS;
        self.move_speed = MIN_SPEED;
        self.x = screen.width / 2;
        self.mx = self.x;
        self.flashing = FLASH_TICKS;
        self.shield = 0;
        self.alive = true;
        self.dead_time = 0;
        info!("player respawned, {} ships left", self.ships);
        Some(PlayerEvent::Respawned)
    }
}
