use galaga_swarm::alien::*;
use galaga_swarm::audio::{self, RecordingAudio};
use galaga_swarm::constants::*;
use galaga_swarm::effects::*;
use galaga_swarm::entities::*;
use galaga_swarm::player::*;
use galaga_swarm::swarm::*;
use galaga_swarm::torpedoes::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn screen() -> Screen {
    Screen::new(NORMAL_WIDTH, NORMAL_HEIGHT)
}

/// Everything `Player::update` touches besides the player.
struct World {
    swarm: Swarm,
    explosions: Explosions,
    prizes: Prizes,
    audio: RecordingAudio,
    rng: StdRng,
}

fn make_world() -> World {
    World {
        swarm: Swarm::new(),
        explosions: Explosions::new(),
        prizes: Prizes::new(),
        audio: RecordingAudio::default(),
        rng: seeded_rng(),
    }
}

fn step(player: &mut Player, world: &mut World) -> Option<PlayerEvent> {
    player.update(
        screen(),
        1,
        &mut world.swarm,
        &mut world.explosions,
        &mut world.prizes,
        &mut world.audio,
        &mut world.rng,
    )
}

fn place(swarm: &mut Swarm, id: usize, x: f64, y: f64, state: AlienState) {
    let alien = &mut swarm.aliens[id];
    alien.x = x;
    alien.y = y;
    alien.state = state;
    swarm.stats = SwarmStats::scan(&swarm.aliens);
}

// ── Setup ─────────────────────────────────────────────────────────────────────

#[test]
fn new_player_starts_centred_at_bottom() {
    let p = Player::new(screen());
    assert_eq!(p.x, 200); // width / 2
    assert_eq!(p.y, 490); // height - SHIP_HEIGHT / 2
    assert_eq!(p.ships, START_SHIPS);
    assert_eq!(p.weapon, Weapon::Single);
    assert_eq!(p.max_torps, MIN_TORPS);
    assert!(p.is_vulnerable());
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn move_intent_steps_by_move_speed() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.start_move_right();
    step(&mut p, &mut world);
    assert_eq!(p.x, 203);
    p.stop_move_right();
    step(&mut p, &mut world);
    assert_eq!(p.x, 203);
}

#[test]
fn ship_stays_inside_edge_margin() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.start_move_left();
    for _ in 0..100 {
        step(&mut p, &mut world);
    }
    assert_eq!(p.x, EDGE_MARGIN);
    p.start_move_right();
    for _ in 0..200 {
        step(&mut p, &mut world);
    }
    assert_eq!(p.x, NORMAL_WIDTH - EDGE_MARGIN);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn single_shot_fires_one_torpedo_and_arms_cooldown() {
    let mut audio = RecordingAudio::default();
    let mut p = Player::new(screen());
    p.fire(screen(), 1, &mut audio);
    let torps: Vec<_> = p.torps.live().cloned().collect();
    assert_eq!(torps.len(), 1);
    assert_eq!((torps[0].x, torps[0].y), (200, 480));
    assert_eq!((torps[0].x_speed, torps[0].y_speed), (0, -TORP_SPEED));
    assert_eq!(p.torp_ok, TORP_DELAY);
    assert_eq!(audio.played, vec![audio::FIRE_TORP.to_string()]);

    p.fire(screen(), 1, &mut audio); // still cooling down
    assert_eq!(p.torps.count(), 1);
}

#[test]
fn no_firing_during_warp() {
    let mut audio = RecordingAudio::default();
    let mut p = Player::new(screen());
    p.fire(screen(), 2, &mut audio);
    assert_eq!(p.torps.count(), 0);
    assert!(audio.played.is_empty());
}

#[test]
fn triple_shot_fans_out() {
    let mut audio = RecordingAudio::default();
    let mut p = Player::new(screen());
    p.weapon = Weapon::Triple;
    p.max_torps = 4;
    p.fire(screen(), 1, &mut audio);
    let speeds: Vec<_> = p.torps.live().map(|t| (t.x_speed, t.y_speed)).collect();
    assert_eq!(speeds, vec![(-2, -11), (0, -12), (2, -11)]);
}

#[test]
fn double_shot_needs_two_free_slots_but_still_cools_down() {
    let mut audio = RecordingAudio::default();
    let mut p = Player::new(screen());
    p.weapon = Weapon::Double;
    p.torps.fire(MIN_TORPS, 50, 100, 0, -TORP_SPEED);
    p.torps.fire(MIN_TORPS, 60, 100, 0, -TORP_SPEED);
    p.fire(screen(), 1, &mut audio);
    assert_eq!(p.torps.count(), 2);
    assert_eq!(p.torp_ok, TORP_DELAY);
    assert!(audio.played.is_empty());
}

#[test]
fn torpedo_slots_beyond_limit_stay_unused() {
    let mut torps = PlayerTorpedoes::new();
    for i in 0..3 {
        assert!(torps.fire(3, i * 10, 100, 0, -TORP_SPEED));
    }
    let before = torps.slots.clone();
    assert!(!torps.fire(3, 999, 100, 0, -TORP_SPEED));
    assert_eq!(torps.slots, before);
    assert!(torps.slots[3..].iter().all(|t| !t.alive));
}

#[test]
fn torpedo_dies_past_top_edge() {
    let mut torps = PlayerTorpedoes::new();
    torps.fire(3, 100, 5, 0, -TORP_SPEED);
    torps.advance(0, screen());
    assert_eq!(torps.count(), 0);
}

// ── Collisions and scoring ────────────────────────────────────────────────────

#[test]
fn torpedo_hits_parked_flagship() {
    let mut world = make_world();
    place(&mut world.swarm, 0, 100.0, 96.0, AlienState::InFormation);
    let mut p = Player::new(screen());
    p.torps.fire(p.max_torps, 100, 100, 0, -TORP_SPEED);

    step(&mut p, &mut world);

    assert_eq!(p.score, FORMATION_FLAGSHIP_SCORE);
    assert!(!world.swarm.aliens[0].is_alive());
    assert_eq!(world.swarm.live_count(), 0);
    assert_eq!(p.torps.count(), 0); // torpedo slot freed
    let booms: Vec<_> = world.explosions.running().collect();
    assert_eq!(booms.len(), 1);
    assert_eq!(booms[0].kind, ExplosionKind::Flagship);
    assert!(world.audio.played.contains(&audio::ALIEN_EXPLODE.to_string()));
}

#[test]
fn one_torpedo_brings_down_one_alien() {
    let mut world = make_world();
    place(&mut world.swarm, 20, 100.0, 96.0, AlienState::InFormation);
    place(&mut world.swarm, 21, 101.0, 97.0, AlienState::InFormation);
    let mut p = Player::new(screen());
    p.torps.fire(p.max_torps, 100, 100, 0, -TORP_SPEED);
    step(&mut p, &mut world);
    assert_eq!(world.swarm.live_count(), 1);
    assert_eq!(p.score, FORMATION_ESCORT_SCORE);
}

#[test]
fn diving_escort_scores_by_row() {
    let mut world = make_world();
    let diving = AlienState::Attacking {
        heading: Direction::S,
        steer: 10,
        path: None,
    };
    place(&mut world.swarm, 25, 100.0, 200.0, diving);
    let mut p = Player::new(screen());
    p.score_kill(
        25,
        &mut world.swarm,
        &mut world.explosions,
        &mut world.prizes,
        &mut world.rng,
    );
    assert_eq!(p.score, 400); // (6 - row 2) × 100
}

#[test]
fn diving_flagship_bonus_counts_escorts() {
    let mut world = make_world();
    place(
        &mut world.swarm,
        0,
        100.0,
        200.0,
        AlienState::Attacking {
            heading: Direction::S,
            steer: 10,
            path: None,
        },
    );
    for e in [9, 10] {
        place(
            &mut world.swarm,
            e,
            100.0,
            190.0,
            AlienState::Escorting {
                flagship: 0,
                heading: Some(Direction::S),
            },
        );
    }
    let mut p = Player::new(screen());
    p.score_kill(
        0,
        &mut world.swarm,
        &mut world.explosions,
        &mut world.prizes,
        &mut world.rng,
    );
    assert_eq!(p.score, FLAGSHIP_BONUS[2]);
}

#[test]
fn parked_kills_never_drop_prizes() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.got_lemon = true;
    for id in 10..60 {
        place(&mut world.swarm, id, 100.0, 100.0, AlienState::InFormation);
        p.score_kill(
            id,
            &mut world.swarm,
            &mut world.explosions,
            &mut world.prizes,
            &mut world.rng,
        );
    }
    assert!(world.prizes.is_empty());
}

// ── Prizes ────────────────────────────────────────────────────────────────────

#[test]
fn weapon_prize_switches_then_upgrades() {
    let mut p = Player::new(screen());
    p.collect(PrizeKind::DoubleShot);
    assert_eq!(p.weapon, Weapon::Double);
    assert_eq!(p.max_torps, MIN_TORPS);
    p.collect(PrizeKind::DoubleShot);
    assert_eq!(p.max_torps, MIN_TORPS + 1);
}

#[test]
fn upgrades_are_capped() {
    let mut p = Player::new(screen());
    for _ in 0..20 {
        p.collect(PrizeKind::SingleShot);
        p.collect(PrizeKind::Speed);
    }
    assert_eq!(p.max_torps, MAX_TORPS);
    assert_eq!(p.move_speed, MAX_SPEED);
}

#[test]
fn shield_makes_ship_invulnerable_until_it_wears_off() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.collect(PrizeKind::Shield);
    assert!(!p.is_vulnerable());
    assert!(!p.target().vulnerable);
    for _ in 0..SHIELD_TICKS {
        step(&mut p, &mut world);
    }
    assert!(p.is_vulnerable());
}

#[test]
fn lemon_lasts_until_next_level() {
    let mut p = Player::new(screen());
    p.collect(PrizeKind::Lemon);
    assert!(p.got_lemon);
    p.next_level();
    assert!(!p.got_lemon);
}

// ── Death and respawn ─────────────────────────────────────────────────────────

#[test]
fn destroy_is_idempotent() {
    let mut explosions = Explosions::new();
    let mut p = Player::new(screen());
    assert!(p.destroy(&mut explosions));
    assert!(!p.destroy(&mut explosions));
    assert_eq!(explosions.running().count(), 1);
}

#[test]
fn respawn_after_delay_with_flashing() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.weapon = Weapon::Triple;
    p.x = 50;
    p.destroy(&mut world.explosions);

    for _ in 0..RESPAWN_DELAY - 1 {
        assert_eq!(step(&mut p, &mut world), None);
        assert!(!p.alive);
    }
    assert_eq!(step(&mut p, &mut world), Some(PlayerEvent::Respawned));
    assert!(p.alive);
    assert_eq!(p.ships, START_SHIPS - 1);
    assert_eq!(p.flashing, FLASH_TICKS);
    assert_eq!(p.weapon, Weapon::Single);
    assert_eq!(p.x, 200);
    assert!(!p.is_vulnerable());

    for _ in 0..FLASH_TICKS {
        step(&mut p, &mut world);
    }
    assert!(p.is_vulnerable());
}

#[test]
fn last_tick_of_death_timer_respawns() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.alive = false;
    p.dead_time = RESPAWN_DELAY - 1;
    p.weapon = Weapon::Double;
    p.move_speed = MAX_SPEED;
    p.x = 321;
    assert_eq!(step(&mut p, &mut world), Some(PlayerEvent::Respawned));
    assert!(p.alive);
    assert_eq!(p.ships, 1);
    assert_eq!(p.weapon, Weapon::Single);
    assert_eq!(p.move_speed, MIN_SPEED);
    assert_eq!(p.flashing, FLASH_TICKS);
    assert_eq!(p.dead_time, 0);
    assert_eq!(p.x, 200);
}

#[test]
fn last_ship_ends_game_exactly_once() {
    let mut world = make_world();
    let mut p = Player::new(screen());
    p.ships = 0;
    p.destroy(&mut world.explosions);

    let events: Vec<_> = (0..RESPAWN_DELAY * 3)
        .filter_map(|_| step(&mut p, &mut world))
        .collect();
    assert_eq!(events, vec![PlayerEvent::GameOver]);
    assert!(p.game_over);
    assert!(!p.alive);
}

#[test]
fn dead_player_is_no_target() {
    let mut explosions = Explosions::new();
    let mut p = Player::new(screen());
    p.destroy(&mut explosions);
    let target: PlayerTarget = p.target();
    assert!(!target.vulnerable);
}
