//! Shared entity types: mostly plain data, plus the compass arithmetic.

// ── Directions ────────────────────────────────────────────────────────────────

/// Sixteen compass points, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

/// Per-tick (dx, dy) for each direction; y grows downwards.
const MOVES: [(i32, i32); 16] = [
    (0, -4),
    (1, -4),
    (3, -3),
    (4, -1),
    (4, 0),
    (4, 1),
    (3, 3),
    (1, 4),
    (0, 4),
    (-1, 4),
    (-3, 3),
    (-4, 1),
    (-4, 0),
    (-4, -1),
    (-3, -3),
    (-1, -4),
];

impl Direction {
    pub const ALL: [Direction; 16] = [
        Direction::N,
        Direction::NNE,
        Direction::NE,
        Direction::ENE,
        Direction::E,
        Direction::ESE,
        Direction::SE,
        Direction::SSE,
        Direction::S,
        Direction::SSW,
        Direction::SW,
        Direction::WSW,
        Direction::W,
        Direction::WNW,
        Direction::NW,
        Direction::NNW,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// `None` for anything outside 0..16, including the path sentinel −1.
    pub fn from_index(index: i32) -> Option<Direction> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn rotate_right(self) -> Direction {
        Self::ALL[(self.index() + 1) % 16]
    }

    pub fn rotate_left(self) -> Direction {
        Self::ALL[(self.index() + 15) % 16]
    }

    pub fn step(self) -> (i32, i32) {
        MOVES[self.index()]
    }
}

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Viewport size in simulation pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Screen {
    pub fn new(width: i32, height: i32) -> Self {
        Screen { width, height }
    }

    /// Maps a point from the 400×500 authoring space onto this screen.
    pub fn scale(&self, normal_x: i32, normal_y: i32) -> (f64, f64) {
        use crate::constants::{NORMAL_HEIGHT, NORMAL_WIDTH};
        (
            (normal_x * self.width / NORMAL_WIDTH) as f64,
            (normal_y * self.height / NORMAL_HEIGHT) as f64,
        )
    }
}

// ── Player weapon ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weapon {
    Single,
    Double,
    Triple,
}

impl Weapon {
    pub fn tier(self) -> i32 {
        match self {
            Weapon::Single => 0,
            Weapon::Double => 1,
            Weapon::Triple => 2,
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct AlienTorpedo {
    pub x: i32,
    pub y: i32,
    pub x_speed: i32,
    pub y_speed: i32,
    /// Animation counter, advanced every tick.
    pub frame: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerTorpedo {
    pub x: i32,
    pub y: i32,
    pub x_speed: i32,
    pub y_speed: i32,
    pub alive: bool,
    pub frame: u32,
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExplosionKind {
    #[default]
    Alien,
    Flagship,
    Player,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Explosion {
    pub x: i32,
    pub y: i32,
    pub kind: ExplosionKind,
    pub frame: u32,
    pub running: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizeKind {
    /// Switch to single shot, or one more torpedo if already equipped.
    SingleShot,
    DoubleShot,
    TripleShot,
    /// One step faster ship movement.
    Speed,
    /// Temporary invulnerability.
    Shield,
    /// Makes prizes more likely until the next level.
    Lemon,
}

impl PrizeKind {
    pub const ALL: [PrizeKind; 6] = [
        PrizeKind::SingleShot,
        PrizeKind::DoubleShot,
        PrizeKind::TripleShot,
        PrizeKind::Speed,
        PrizeKind::Shield,
        PrizeKind::Lemon,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Prize {
    pub x: i32,
    pub y: i32,
    pub kind: PrizeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: i32,
    pub y: i32,
    /// Individual parallax factor, 1..=3.
    pub speed: i32,
    pub color: u8,
}

// ── Game state ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    /// Attract screen; only the star field moves.
    Intro,
    Playing,
    /// Ships exhausted; the swarm keeps flying until the deferred prompt.
    GameOver,
    HighScoreEntry { rank: usize },
}

/// Presentation cues queued by the simulation and drained by the front end.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    NextLevelCue { level: u32 },
    PlayerDestroyed,
    PlayerRespawned,
    GameOver { score: u32 },
    HighScorePrompt { rank: usize, score: u32 },
    ReturnedToMenu,
}
