mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{debug, info, warn};

use galaga_swarm::audio::Audio;
use galaga_swarm::clock::Clock;
use galaga_swarm::config::{GameConfig, DEFAULT_CONFIG_FILE};
use galaga_swarm::constants::MAX_NAME_LEN;
use galaga_swarm::entities::{GameEvent, GameStatus};
use galaga_swarm::game::Game;
use galaga_swarm::highscores::{HighScoreEntry, HighScoreStore, HighScores};
use galaga_swarm::level::LevelSet;

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Terminals without release events rely on OS key-repeat
/// (≥ 15 Hz) to keep refreshing it.
const HOLD_WINDOW: u64 = 4;

/// Frames a banner stays on screen.
const BANNER_FRAMES: u32 = 60;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Last reported state of the move intents, so the game only sees edges.
/// Fire follows the key level instead: losing a ship clears it.
#[derive(Default)]
struct Intents {
    left: bool,
    right: bool,
}

impl Intents {
    fn apply(&mut self, game: &mut Game, left: bool, right: bool, fire: bool) {
        let player = &mut game.player;
        if left != self.left {
            if left { player.start_move_left() } else { player.stop_move_left() }
        }
        if right != self.right {
            if right { player.start_move_right() } else { player.stop_move_right() }
        }
        if fire != player.firing {
            if fire { player.start_fire() } else { player.stop_fire() }
        }
        *self = Intents { left, right };
    }
}

// ── Host services ─────────────────────────────────────────────────────────────

/// The terminal has no mixer; cues go to the log.
struct TerminalAudio;

impl Audio for TerminalAudio {
    fn play_sound(&mut self, name: &str) {
        debug!("sound: {}", name);
    }
}

/// High-score table that writes itself back to disk after every change.
struct PersistentScores {
    path: PathBuf,
    table: HighScores,
}

impl PersistentScores {
    fn open(path: &Path) -> Self {
        PersistentScores {
            path: path.to_path_buf(),
            table: HighScores::load(path),
        }
    }
}

impl HighScoreStore for PersistentScores {
    fn determine_rank(&self, score: u32) -> usize {
        self.table.determine_rank(score)
    }

    fn add(&mut self, name: &str, level: u32, score: u32) {
        self.table.add(name, level, score);
        if let Err(e) = self.table.save(&self.path) {
            warn!("could not save high scores to {}: {}", self.path.display(), e);
        }
    }

    fn entries(&self) -> &[HighScoreEntry] {
        self.table.entries()
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Front-end state that lives outside the simulation.
#[derive(Default)]
struct Ui {
    banner: Option<(String, u32)>,
    name: String,
}

impl Ui {
    fn show(&mut self, text: String) {
        self.banner = Some((text, BANNER_FRAMES));
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelStarted { level } => self.show(format!("── LEVEL {} ──", level)),
            GameEvent::NextLevelCue { level } => {
                self.show(format!("WARPING TO LEVEL {}", level))
            }
            GameEvent::PlayerDestroyed => self.banner = None,
            GameEvent::PlayerRespawned => self.show("READY".to_string()),
            GameEvent::GameOver { .. } => self.banner = None,
            GameEvent::HighScorePrompt { .. } => self.name.clear(),
            GameEvent::ReturnedToMenu => self.banner = None,
        }
    }

    fn step(&mut self) {
        if let Some((_, frames)) = &mut self.banner {
            *frames = frames.saturating_sub(1);
            if *frames == 0 {
                self.banner = None;
            }
        }
    }
}

/// Runs until the player quits.
///
/// Rendering runs once per loop iteration; the simulation only advances
/// when the clock says a tick is due, and not at all while paused.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    clock: &mut Clock,
    rx: &mpsc::Receiver<Event>,
) -> anyhow::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut intents = Intents::default();
    let mut ui = Ui::default();
    let mut frame: u64 = 0;
    clock.start(Instant::now());

    loop {
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        clock.stop();
                        break;
                    }
                    if let GameStatus::HighScoreEntry { .. } = game.status {
                        match code {
                            KeyCode::Enter => {
                                let name = if ui.name.trim().is_empty() {
                                    "anonymous".to_string()
                                } else {
                                    ui.name.clone()
                                };
                                game.submit_high_score(&name);
                            }
                            KeyCode::Backspace => {
                                ui.name.pop();
                            }
                            KeyCode::Char(c)
                                if !c.is_control() && ui.name.chars().count() < MAX_NAME_LEN =>
                            {
                                ui.name.push(c);
                            }
                            _ => {}
                        }
                        continue;
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => {
                            clock.stop();
                            break;
                        }
                        KeyCode::Esc if game.status != GameStatus::Intro => {
                            clock.resume(Instant::now());
                            game.goto_menu();
                        }
                        KeyCode::Char(' ') | KeyCode::Enter
                            if game.status == GameStatus::Intro =>
                        {
                            // Swallow this press so the first frame doesn't fire.
                            key_frame.remove(&code);
                            game.new_game();
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') if game.is_playing() => {
                            if clock.is_paused() {
                                clock.resume(Instant::now());
                            } else {
                                clock.pause();
                            }
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if !clock.is_running() {
            return Ok(());
        }

        // ── Held keys become start/stop intents ───────────────────────────────
        if game.is_playing() && !clock.is_paused() {
            let left = any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            );
            let right = any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            );
            let fire = is_held(&key_frame, &KeyCode::Char(' '), frame);
            intents.apply(game, left, right, fire);
        } else {
            intents = Intents::default();
        }

        if clock.poll(Instant::now()) {
            game.tick();
            for event in game.drain_events() {
                debug!("event: {:?}", event);
                ui.on_event(&event);
            }
            ui.step();
        }

        let overlay = display::Overlay {
            paused: clock.is_paused(),
            banner: ui.banner.as_ref().map(|(text, _)| text.as_str()),
            name: &ui.name,
        };
        display::render(out, game, &overlay)?;

        let wait = clock.until_next(Instant::now()).min(clock.period());
        if wait > Duration::ZERO {
            thread::sleep(wait);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = GameConfig::load(&config_path);

    simple_logging::log_to_file(&config.log_file, config.log_filter())
        .with_context(|| format!("opening log file {}", config.log_file.display()))?;
    info!("starting with config {}", config_path.display());

    let levels = match &config.levels_file {
        Some(path) => LevelSet::load(path)
            .with_context(|| format!("loading levels from {}", path.display()))?,
        None => LevelSet::builtin().context("loading built-in levels")?,
    };
    let scores = PersistentScores::open(&config.high_score_file);
    let mut game = Game::new(&config, levels, Box::new(TerminalAudio), Box::new(scores));
    let mut clock = Clock::new(config.tick());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release events let held keys end immediately where supported.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &mut game, &mut clock, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!("exiting on error: {:#}", e);
    }
    info!("final score {}", game.player.score);
    result
}
