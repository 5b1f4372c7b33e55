//! Tuning constants shared by the simulation.
//!
//! Distances are in simulation pixels, durations in ticks.

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Width of the normalized space entry-script coordinates are authored in.
pub const NORMAL_WIDTH: i32 = 400;
/// Height of the normalized space entry-script coordinates are authored in.
pub const NORMAL_HEIGHT: i32 = 500;

/// Fixed simulation period in milliseconds (≈30 ticks per second).
pub const TICK_MS: u64 = 33;

// ── Swarm ─────────────────────────────────────────────────────────────────────

pub const MAX_ALIENS: usize = 60;
/// Slots below this id are flagships.
pub const FLAGSHIPS: usize = 10;
pub const SLOTS_PER_ROW: usize = 10;
pub const SLOT_SPACING: i32 = 20;
/// Horizontal span of a full formation row; the convoy bounces inside
/// `[0, width - CONVOY_SPAN]`.
pub const CONVOY_SPAN: i32 = 180;
/// Escorts of flagship `f` live at `f + ESCORT_OFFSET .. f + ESCORT_OFFSET + ESCORTS`.
pub const ESCORT_OFFSET: usize = 9;
pub const ESCORTS: usize = 3;

pub const TURN_SPEED: i32 = 10;
pub const MAX_PATH: usize = 50;
/// Attempts at finding an attack path that continues the current heading.
pub const PATH_RETRIES: usize = 8;
pub const MAX_ATTACKING_CAP: u32 = 30;
/// X offset used when wrapping an alien across the side edges.
pub const WRAP_MARGIN: f64 = 20.0;
/// Y an alien re-enters from after falling off the bottom.
pub const REENTRY_Y: f64 = -30.0;
pub const RETURN_DROP: f64 = 2.0;

// ── Torpedoes ─────────────────────────────────────────────────────────────────

pub const MIN_TORPS: usize = 3;
pub const MAX_TORPS: usize = 10;
pub const TORP_SPEED: i32 = 12;
pub const TORP_DELAY: i32 = 5;
pub const DOUBLE_SHOT_SPREAD: i32 = 5;
pub const TRIPLE_SHOT_DRIFT: i32 = 2;

pub const ETORP_SPEED: i32 = 8;
pub const TORP_CHANCE: i32 = 60;
pub const MIN_TORP_CHANCE: i32 = 35;
pub const BASE_ALIEN_TORPS: usize = 10;
pub const ALIEN_TORPS_PER_LEVEL: usize = 5;

pub const HIT_RANGE: i32 = 8;

// ── Player ────────────────────────────────────────────────────────────────────

pub const MIN_SPEED: i32 = 3;
pub const MAX_SPEED: i32 = 8;
pub const START_SHIPS: u32 = 2;
pub const START_LEVEL: u32 = 1;
pub const SHIP_HEIGHT: i32 = 20;
pub const EDGE_MARGIN: i32 = 10;
/// Target used by the "move right" intent; clamped to the screen each tick.
pub const FAR_RIGHT: i32 = 32767;
pub const RESPAWN_DELAY: u32 = 100;
pub const FLASH_TICKS: u32 = 50;
pub const SHIELD_TICKS: u32 = 250;

// ── Scoring ───────────────────────────────────────────────────────────────────

pub const FORMATION_ESCORT_SCORE: u32 = 50;
pub const FORMATION_FLAGSHIP_SCORE: u32 = 200;
/// Flagship shot while attacking, indexed by live escort count.
pub const FLAGSHIP_BONUS: [u32; 4] = [400, 800, 1600, 3200];

// ── Prizes ────────────────────────────────────────────────────────────────────

pub const PRIZE_CHANCE: u32 = 10;
pub const LEMON_PRIZE_CHANCE: u32 = 3;
pub const PRIZE_SPEED: i32 = 4;
pub const PRIZE_CATCH_RANGE: i32 = 15;

// ── Effects ───────────────────────────────────────────────────────────────────

pub const MAX_EXPLOSIONS: usize = 10;
pub const EXPLOSION_FRAMES: u32 = 4;
pub const MAX_STARS: usize = 30;
pub const STAR_SPEED_CAP: i32 = 20;

// ── Level transition (warp) ───────────────────────────────────────────────────

pub const WARP_CUE_SPEED: i32 = 2;
pub const WARP_PEAK_SPEED: i32 = 120;
pub const WARP_REVERSE_SPEED: i32 = -20;

// ── Game flow ─────────────────────────────────────────────────────────────────

/// Ticks between game over and the high-score prompt (≈5 s).
pub const GAME_OVER_DELAY_TICKS: u64 = 150;
pub const HIGH_SCORE_ENTRIES: usize = 5;
pub const MAX_NAME_LEN: usize = 12;
