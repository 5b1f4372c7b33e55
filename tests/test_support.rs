use std::time::{Duration, Instant};

use galaga_swarm::clock::*;
use galaga_swarm::config::GameConfig;
use galaga_swarm::constants::*;
use galaga_swarm::effects::*;
use galaga_swarm::entities::*;
use galaga_swarm::highscores::*;

use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn screen() -> Screen {
    Screen::new(NORMAL_WIDTH, NORMAL_HEIGHT)
}

const PERIOD: Duration = Duration::from_millis(33);

fn make_table(scores: &[u32]) -> HighScores {
    let mut table = HighScores::default();
    for (i, &score) in scores.iter().enumerate() {
        table.add(&format!("p{}", i), 1, score);
    }
    table
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[test]
fn clock_idle_until_started() {
    let mut clock = Clock::new(PERIOD);
    let now = Instant::now();
    assert!(!clock.is_running());
    assert!(!clock.poll(now));
    clock.start(now);
    assert!(clock.poll(now)); // first tick is due immediately
    assert!(!clock.poll(now));
    assert!(clock.poll(now + PERIOD));
}

#[test]
fn clock_does_not_catch_up() {
    let mut clock = Clock::new(PERIOD);
    let t0 = Instant::now();
    clock.start(t0);
    clock.poll(t0);
    let late = t0 + PERIOD * 10;
    assert!(clock.poll(late));
    assert!(!clock.poll(late)); // nine missed ticks are dropped
    assert_eq!(clock.until_next(late), PERIOD);
}

#[test]
fn paused_clock_resumes_one_period_later() {
    let mut clock = Clock::new(PERIOD);
    let t0 = Instant::now();
    clock.start(t0);
    clock.poll(t0);
    clock.pause();
    assert!(clock.is_paused());
    assert!(clock.is_running());
    assert!(!clock.poll(t0 + PERIOD * 5));

    let t1 = t0 + PERIOD * 50;
    clock.resume(t1);
    assert!(!clock.is_paused());
    assert!(!clock.poll(t1));
    assert!(clock.poll(t1 + PERIOD));
}

#[test]
fn stopped_clock_stays_quiet() {
    let mut clock = Clock::new(PERIOD);
    let t0 = Instant::now();
    clock.start(t0);
    clock.stop();
    assert!(!clock.is_running());
    clock.pause(); // no effect when stopped
    assert!(!clock.is_paused());
    assert!(!clock.poll(t0 + PERIOD));
}

// ── Timers ────────────────────────────────────────────────────────────────────

#[test]
fn timers_fire_in_order_once_due() {
    let mut timers = Timers::new();
    timers.schedule(10, "b");
    timers.schedule(5, "a");
    timers.schedule(10, "c");
    assert!(timers.take_due(4).is_empty());
    assert_eq!(timers.take_due(5), vec!["a"]);
    assert_eq!(timers.take_due(12), vec!["b", "c"]);
    assert!(timers.is_empty());
}

#[test]
fn cancelled_timers_never_fire() {
    let mut timers = Timers::new();
    timers.schedule(5, 1);
    timers.cancel_all();
    assert_eq!(timers.len(), 0);
    timers.schedule(6, 2);
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.take_due(10), vec![2]);
}

// ── High scores ───────────────────────────────────────────────────────────────

#[test]
fn empty_table_ranks_anything_first() {
    let table = HighScores::default();
    assert_eq!(table.determine_rank(0), 1);
}

#[test]
fn rank_is_first_entry_beaten() {
    let table = make_table(&[500, 300, 100]);
    assert_eq!(table.determine_rank(600), 1);
    assert_eq!(table.determine_rank(300), 3); // ties do not displace
    assert_eq!(table.determine_rank(50), 4); // room left at the bottom
}

#[test]
fn full_table_rejects_low_scores() {
    let table = make_table(&[500, 400, 300, 200, 100]);
    assert_eq!(table.determine_rank(100), 0);
    assert_eq!(table.determine_rank(101), 5);
}

#[test]
fn add_keeps_order_and_size() {
    let mut table = make_table(&[500, 400, 300, 200, 100]);
    table.add("new", 4, 350);
    let scores: Vec<u32> = table.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![500, 400, 350, 300, 200]);
    assert_eq!(table.entries()[2].name, "new");
    assert_eq!(table.entries()[2].level, 4);
}

#[test]
fn long_names_are_trimmed() {
    let mut table = HighScores::default();
    table.add("  a-very-long-pilot-name  ", 1, 10);
    assert_eq!(table.entries()[0].name.chars().count(), MAX_NAME_LEN);
    assert_eq!(table.entries()[0].name, "a-very-long-");
}

#[test]
fn saved_table_loads_back() {
    let path = std::env::temp_dir().join(format!("galaga_swarm_scores_{}.toml", std::process::id()));
    let table = make_table(&[900, 20]);
    table.save(&path).unwrap();
    let loaded = HighScores::load(&path);
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, table);
}

#[test]
fn missing_or_corrupt_file_gives_empty_table() {
    assert!(HighScores::load(std::path::Path::new("/nonexistent/scores.toml"))
        .entries()
        .is_empty());

    let path = std::env::temp_dir().join(format!("galaga_swarm_bad_{}.toml", std::process::id()));
    std::fs::write(&path, "entries = 7").unwrap();
    let loaded = HighScores::load(&path);
    let _ = std::fs::remove_file(&path);
    assert!(loaded.entries().is_empty());
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn partial_config_keeps_defaults() {
    let config = GameConfig::from_toml("tick_ms = 20\nseed = 9\n").unwrap();
    assert_eq!(config.tick(), Duration::from_millis(20));
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.screen(), screen());
    assert_eq!(config.start_level, START_LEVEL);
    assert!(config.levels_file.is_none());
}

#[test]
fn log_level_parses_with_fallback() {
    let mut config = GameConfig::default();
    assert_eq!(config.log_filter(), LevelFilter::Info);
    config.log_level = "debug".to_string();
    assert_eq!(config.log_filter(), LevelFilter::Debug);
    config.log_level = "loud".to_string();
    assert_eq!(config.log_filter(), LevelFilter::Info);
}

#[test]
fn tiny_screen_is_raised_to_minimum() {
    let config = GameConfig::from_toml("screen_width = 10\nscreen_height = 10\n").unwrap();
    assert_eq!(config.screen(), Screen::new(NORMAL_WIDTH / 2, NORMAL_HEIGHT / 2));
}

#[test]
fn missing_config_file_gives_defaults() {
    let config = GameConfig::load(std::path::Path::new("/nonexistent/galaga_swarm.toml"));
    assert_eq!(config, GameConfig::default());
}

// ── Explosions ────────────────────────────────────────────────────────────────

#[test]
fn explosion_pool_drops_overflow() {
    let mut explosions = Explosions::new();
    for i in 0..MAX_EXPLOSIONS as i32 {
        assert!(explosions.spawn(i, 0, ExplosionKind::Alien));
    }
    assert!(!explosions.spawn(99, 0, ExplosionKind::Player));
    assert_eq!(explosions.running().count(), MAX_EXPLOSIONS);
}

#[test]
fn explosion_runs_its_frames_then_stops() {
    let mut explosions = Explosions::new();
    explosions.spawn(10, 10, ExplosionKind::Flagship);
    for _ in 0..EXPLOSION_FRAMES {
        explosions.update();
    }
    assert_eq!(explosions.running().count(), 1);
    explosions.update();
    assert_eq!(explosions.running().count(), 0);
}

// ── Prizes ────────────────────────────────────────────────────────────────────

#[test]
fn prize_caught_near_ship() {
    let mut prizes = Prizes::new();
    prizes.spawn(200, 478, PrizeKind::Shield);
    let caught = prizes.update(screen(), 205, true);
    assert_eq!(caught, vec![PrizeKind::Shield]);
    assert!(prizes.is_empty());
}

#[test]
fn prize_missed_falls_away() {
    let mut prizes = Prizes::new();
    prizes.spawn(200, 478, PrizeKind::Speed);
    assert!(prizes.update(screen(), 200, false).is_empty()); // dead ships catch nothing
    assert_eq!(prizes.len(), 1);
    for _ in 0..5 {
        assert!(prizes.update(screen(), 50, true).is_empty());
    }
    assert!(prizes.is_empty());
}

#[test]
fn random_prizes_are_real_kinds() {
    let mut rng = seeded_rng();
    let mut prizes = Prizes::new();
    for _ in 0..20 {
        prizes.spawn_random(100, 100, &mut rng);
    }
    assert_eq!(prizes.len(), 20);
    assert!(prizes.iter().all(|p| PrizeKind::ALL.contains(&p.kind)));
}

// ── Star field ────────────────────────────────────────────────────────────────

fn single_star(y: i32, speed: i32) -> StarField {
    let mut field = StarField::new(screen(), &mut seeded_rng());
    field.stars = vec![Star {
        x: 10,
        y,
        speed,
        color: 0,
    }];
    field
}

#[test]
fn stars_scroll_by_own_speed() {
    let mut rng = seeded_rng();
    let mut field = single_star(0, 2);
    field.update(screen(), &mut rng);
    assert_eq!(field.stars[0].y, 2);
}

#[test]
fn warp_speed_uses_magnitude_and_cap() {
    let mut rng = seeded_rng();
    let mut field = single_star(0, 2);
    field.set_speed(WARP_REVERSE_SPEED);
    field.update(screen(), &mut rng);
    assert_eq!(field.stars[0].y, 40); // |-20| × 2
    field.set_speed(WARP_PEAK_SPEED);
    field.update(screen(), &mut rng);
    assert_eq!(field.stars[0].y, 40 + STAR_SPEED_CAP * 2);
}

#[test]
fn stars_wrap_to_top() {
    let mut rng = seeded_rng();
    let mut field = single_star(490, 3);
    field.set_speed(10);
    field.update(screen(), &mut rng);
    assert_eq!(field.stars[0].y, 20); // 490 + 30 - 500
    assert!(field.stars[0].x >= 0 && field.stars[0].x < NORMAL_WIDTH);
}

#[test]
fn new_field_is_populated() {
    let field = StarField::new(screen(), &mut seeded_rng());
    assert_eq!(field.stars.len(), MAX_STARS);
    assert_eq!(field.speed(), 1);
}
