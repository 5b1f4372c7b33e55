//! Top-level game state and the fixed-tick update that drives it.
//!
//! One `tick()` runs, in order: deferred actions, star field, swarm (with
//! the alien torpedoes), player (with its torpedoes and their collisions),
//! explosions and prizes, then the level-clear check. Rendering reads the
//! public fields between ticks.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{self, Audio};
use crate::clock::Timers;
use crate::config::GameConfig;
use crate::constants::{GAME_OVER_DELAY_TICKS, WARP_CUE_SPEED, WARP_PEAK_SPEED, WARP_REVERSE_SPEED};
use crate::effects::{Explosions, Prizes, StarField};
use crate::entities::{GameEvent, GameStatus, Screen};
use crate::highscores::HighScoreStore;
use crate::level::LevelSet;
use crate::player::{Player, PlayerEvent};
use crate::swarm::Swarm;

/// State changes scheduled for a later tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    /// Leave the game-over screen for high-score entry or the menu.
    AfterGameOver,
}

pub struct Game {
    pub screen: Screen,
    pub levels: LevelSet,
    pub start_level: u32,
    pub level_no: u32,
    pub status: GameStatus,
    /// Ticks since the game was created.
    pub ticks: u64,
    pub star_field: StarField,
    pub swarm: Swarm,
    pub player: Player,
    pub explosions: Explosions,
    pub prizes: Prizes,
    rng: StdRng,
    timers: Timers<Deferred>,
    events: Vec<GameEvent>,
    audio: Box<dyn Audio>,
    scores: Box<dyn HighScoreStore>,
}

impl Game {
    pub fn new(
        config: &GameConfig,
        levels: LevelSet,
        audio: Box<dyn Audio>,
        scores: Box<dyn HighScoreStore>,
    ) -> Self {
        let screen = config.screen();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let start_level = config.start_level.max(1);
        Game {
            screen,
            levels,
            start_level,
            level_no: start_level,
            status: GameStatus::Intro,
            ticks: 0,
            star_field: StarField::new(screen, &mut rng),
            swarm: Swarm::new(),
            player: Player::new(screen),
            explosions: Explosions::new(),
            prizes: Prizes::new(),
            rng,
            timers: Timers::new(),
            events: Vec::new(),
            audio,
            scores,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn high_scores(&self) -> &dyn HighScoreStore {
        self.scores.as_ref()
    }

    /// Presentation events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Flow ─────────────────────────────────────────────────────────────────

    pub fn new_game(&mut self) {
        self.timers.cancel_all();
        self.level_no = self.start_level;
        self.player.reset(self.screen);
        self.swarm.init(self.level_no, &self.levels, self.screen);
        self.explosions.clear();
        self.prizes.clear();
        self.star_field.set_speed(1);
        self.status = GameStatus::Playing;
        info!("new game at level {}", self.level_no);
        self.events.push(GameEvent::LevelStarted {
            level: self.level_no,
        });
    }

    pub fn goto_menu(&mut self) {
        self.timers.cancel_all();
        self.player.stop_fire();
        self.star_field.set_speed(1);
        self.status = GameStatus::Intro;
        self.events.push(GameEvent::ReturnedToMenu);
    }

    /// Records the finished game under `name`, then returns to the menu.
    pub fn submit_high_score(&mut self, name: &str) {
        if let GameStatus::HighScoreEntry { rank } = self.status {
            info!("high score #{} for {}: {}", rank, name, self.player.score);
            self.scores.add(name, self.level_no, self.player.score);
            self.goto_menu();
        }
    }

    fn end_game(&mut self) {
        self.status = GameStatus::GameOver;
        self.player.stop_fire();
        self.events.push(GameEvent::GameOver {
            score: self.player.score,
        });
        self.timers
            .schedule(self.ticks + GAME_OVER_DELAY_TICKS, Deferred::AfterGameOver);
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::AfterGameOver if self.status == GameStatus::GameOver => {
                let score = self.player.score;
                let rank = self.scores.determine_rank(score);
                if rank > 0 {
                    self.status = GameStatus::HighScoreEntry { rank };
                    self.events.push(GameEvent::HighScorePrompt { rank, score });
                } else {
                    self.goto_menu();
                }
            }
            Deferred::AfterGameOver => {}
        }
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.ticks += 1;
        for action in self.timers.take_due(self.ticks) {
            self.run_deferred(action);
        }

        self.star_field.update(self.screen, &mut self.rng);
        if !matches!(self.status, GameStatus::Playing | GameStatus::GameOver) {
            return;
        }

        let target = self.player.target();
        if self.swarm.update(self.screen, &target, &mut self.rng)
            && self.player.destroy(&mut self.explosions)
        {
            self.audio.play_sound(audio::PLAYER_EXPLODE);
            self.events.push(GameEvent::PlayerDestroyed);
        }

        if self.status != GameStatus::Playing {
            return;
        }

        let event = self.player.update(
            self.screen,
            self.star_field.speed(),
            &mut self.swarm,
            &mut self.explosions,
            &mut self.prizes,
            self.audio.as_mut(),
            &mut self.rng,
        );
        match event {
            Some(PlayerEvent::Respawned) => self.events.push(GameEvent::PlayerRespawned),
            Some(PlayerEvent::GameOver) => self.end_game(),
            None => {}
        }
        self.explosions.update();
        for kind in self
            .prizes
            .update(self.screen, self.player.x, self.player.alive)
        {
            self.player.collect(kind);
            self.audio.play_sound(audio::PRIZE_PICKUP);
        }

        self.check_level_clear();
    }

    /// Warp between levels, paced by the star field speed: it climbs by one
    /// per tick from 1, the cue fires at 2, at 120 it flips to −20 and keeps
    /// climbing, and back at 1 the next level starts.
    fn check_level_clear(&mut self) {
        if self.status != GameStatus::Playing || self.swarm.live_count() > 0 {
            return;
        }
        self.star_field.change_speed(1);
        let speed = self.star_field.speed();
        if speed == WARP_CUE_SPEED {
            info!("level {} cleared, warping", self.level_no);
            self.audio.play_sound(audio::WARP);
            self.events.push(GameEvent::NextLevelCue {
                level: self.level_no + 1,
            });
        }
        if speed >= WARP_PEAK_SPEED {
            self.star_field.set_speed(WARP_REVERSE_SPEED);
        } else if speed == 1 {
            self.advance_level();
        }
    }

    fn advance_level(&mut self) {
        self.level_no += 1;
        self.swarm.init(self.level_no, &self.levels, self.screen);
        self.player.next_level();
        self.star_field.set_speed(1);
        self.events.push(GameEvent::LevelStarted {
            level: self.level_no,
        });
    }
}
