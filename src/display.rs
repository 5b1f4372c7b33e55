//! Rendering layer: all terminal output lives here.
//!
//! The simulation works in pixels; every draw call maps a pixel position
//! onto the character grid inside the border. Nothing here changes game
//! state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use galaga_swarm::alien::Alien;
use galaga_swarm::entities::{Explosion, ExplosionKind, GameStatus, PrizeKind, Screen, Weapon};
use galaga_swarm::game::Game;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::Green;
const C_HUD_SHIPS: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_SHIELD: Color = Color::Cyan;
const C_TORP_PLAYER: Color = Color::Cyan;
const C_TORP_ALIEN: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Yellow;
const C_PRIZE: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_STARS: [Color; 4] = [Color::DarkGrey, Color::Grey, Color::White, Color::DarkCyan];
const C_SHAPES: [Color; 5] = [
    Color::Yellow,
    Color::Red,
    Color::Blue,
    Color::Magenta,
    Color::Green,
];

/// Front-end state the renderer needs besides the game itself.
pub struct Overlay<'a> {
    pub paused: bool,
    /// Transient centre-screen message and the frames it has left.
    pub banner: Option<&'a str>,
    /// Name typed so far during high-score entry.
    pub name: &'a str,
}

/// Pixel → cell mapping for the current terminal size.
struct Grid {
    cols: u16,
    rows: u16,
    screen: Screen,
}

impl Grid {
    /// Cell for a pixel position, or `None` outside the playfield.
    fn cell(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        let inner_w = self.cols.saturating_sub(2) as i64;
        let inner_h = self.rows.saturating_sub(4) as i64;
        if x < 0 || y < 0 || x >= self.screen.width || y >= self.screen.height {
            return None;
        }
        let col = 1 + x as i64 * inner_w / self.screen.width as i64;
        let row = 2 + y as i64 * inner_h / self.screen.height as i64;
        Some((col as u16, row as u16))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game, overlay: &Overlay) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let grid = Grid {
        cols,
        rows,
        screen: game.screen,
    };
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &grid)?;
    draw_stars(out, game, &grid)?;

    match game.status {
        GameStatus::Intro => draw_menu(out, game, &grid)?,
        _ => {
            draw_hud(out, game, &grid)?;
            for alien in game.swarm.aliens.iter().filter(|a| a.is_alive()) {
                draw_alien(out, alien, &grid)?;
            }
            draw_torpedoes(out, game, &grid)?;
            for prize in game.prizes.iter() {
                draw_glyph(out, &grid, prize.x, prize.y, C_PRIZE, prize_glyph(prize.kind))?;
            }
            for explosion in game.explosions.running() {
                draw_explosion(out, explosion, &grid)?;
            }
            draw_player(out, game, &grid)?;
        }
    }

    if let Some(text) = overlay.banner {
        draw_centered(out, &grid, rows / 2, text, Color::Cyan)?;
    }
    match game.status {
        GameStatus::GameOver => draw_game_over(out, game, &grid)?,
        GameStatus::HighScoreEntry { rank } => draw_name_entry(out, &grid, rank, overlay.name)?,
        _ => {}
    }
    if overlay.paused {
        draw_centered(out, &grid, rows / 2 + 2, "── PAUSED ── P to resume", Color::White)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Frame ─────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    let w = grid.cols as usize;
    let h = grid.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(grid.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let player = &game.player;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", player.score)))?;

    let weapon = match player.weapon {
        Weapon::Single => "single",
        Weapon::Double => "double",
        Weapon::Triple => "triple",
    };
    let level = format!("[ LEVEL {} | {} x{} ]", game.level_no, weapon, player.max_torps);
    let lx = (grid.cols / 2).saturating_sub(level.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(level))?;

    let ships = format!("Ships:{}", "▲".repeat(player.ships as usize));
    let rx = grid.cols.saturating_sub(ships.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SHIPS))?;
    out.queue(Print(ships))?;

    out.queue(cursor::MoveTo(1, grid.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Fire   P : Pause   ESC : Menu   Q : Quit"))?;
    Ok(())
}

fn draw_stars<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let streak = game.star_field.speed().abs() > 4;
    for star in &game.star_field.stars {
        let color = C_STARS[star.color as usize % C_STARS.len()];
        draw_glyph(out, grid, star.x, star.y, color, if streak { "│" } else { "." })?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_glyph<W: Write>(
    out: &mut W,
    grid: &Grid,
    x: i32,
    y: i32,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    if let Some((col, row)) = grid.cell(x, y) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

/// Flagships are a solid diamond; escorts lean with their heading.
fn draw_alien<W: Write>(out: &mut W, alien: &Alien, grid: &Grid) -> std::io::Result<()> {
    let color = C_SHAPES[alien.shape as usize % C_SHAPES.len()];
    let glyph = if alien.id < 10 {
        "◆"
    } else {
        match alien.heading() {
            None => "ж",
            Some(d) => match d.index() {
                0..=1 | 15 => "▲",
                2..=6 => "▶",
                7..=9 => "▼",
                _ => "◀",
            },
        }
    };
    draw_glyph(out, grid, alien.x as i32, alien.y as i32, color, glyph)
}

fn draw_torpedoes<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    for torp in game.player.torps.live() {
        draw_glyph(out, grid, torp.x, torp.y, C_TORP_PLAYER, "|")?;
    }
    for torp in game.swarm.torpedoes.iter() {
        let glyph = if torp.frame % 2 == 0 { "•" } else { "◦" };
        draw_glyph(out, grid, torp.x, torp.y, C_TORP_ALIEN, glyph)?;
    }
    Ok(())
}

fn draw_explosion<W: Write>(out: &mut W, e: &Explosion, grid: &Grid) -> std::io::Result<()> {
    const FRAMES: [&str; 5] = ["*", "✶", "✹", "✺", "·"];
    let glyph = FRAMES[(e.frame as usize).min(FRAMES.len() - 1)];
    let color = match e.kind {
        ExplosionKind::Alien => C_EXPLOSION,
        ExplosionKind::Flagship => Color::Red,
        ExplosionKind::Player => Color::White,
    };
    draw_glyph(out, grid, e.x, e.y, color, glyph)
}

fn prize_glyph(kind: PrizeKind) -> &'static str {
    match kind {
        PrizeKind::SingleShot => "1",
        PrizeKind::DoubleShot => "2",
        PrizeKind::TripleShot => "3",
        PrizeKind::Speed => "»",
        PrizeKind::Shield => "○",
        PrizeKind::Lemon => "L",
    }
}

fn draw_player<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let player = &game.player;
    // Blink while invulnerable after a respawn.
    if !player.alive || (player.flashing > 0 && (player.flashing / 4) % 2 == 1) {
        return Ok(());
    }
    let color = if player.shield > 0 {
        C_PLAYER_SHIELD
    } else {
        C_PLAYER
    };
    let y = player.y.min(game.screen.height - 1);
    if let Some((col, row)) = grid.cell(player.x, y) {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(col.saturating_sub(1), row))?;
        out.queue(Print("/▲\\"))?;
    }
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    grid: &Grid,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (grid.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let cy = grid.rows / 2;
    draw_centered(out, grid, cy.saturating_sub(8), "◆  G A L A G A   S W A R M  ◆", Color::Cyan)?;

    let table = game.high_scores().entries();
    draw_centered(out, grid, cy.saturating_sub(5), "── HIGH SCORES ──", Color::Yellow)?;
    if table.is_empty() {
        draw_centered(out, grid, cy.saturating_sub(4), "no scores yet", C_HINT)?;
    }
    for (i, entry) in table.iter().enumerate() {
        let line = format!(
            "{}. {:<12} L{:<3} {:>7}",
            i + 1,
            entry.name,
            entry.level,
            entry.score
        );
        draw_centered(out, grid, cy.saturating_sub(4) + i as u16, &line, Color::White)?;
    }

    let legend = "prizes: 1 2 3 weapon   » speed   ○ shield   L lemon";
    draw_centered(out, grid, cy + 3, legend, C_PRIZE)?;
    draw_centered(out, grid, cy + 5, "SPACE / ENTER : Start     Q : Quit", C_HINT)?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, game: &Game, grid: &Grid) -> std::io::Result<()> {
    let cy = grid.rows / 2;
    let lines = [
        "╔════════════════════╗",
        "║    GAME  OVER      ║",
        "╚════════════════════╝",
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_centered(out, grid, cy.saturating_sub(3) + i as u16, line, Color::Red)?;
    }
    let score = format!("Final Score: {:>7}", game.player.score);
    draw_centered(out, grid, cy, &score, Color::Yellow)?;
    Ok(())
}

fn draw_name_entry<W: Write>(out: &mut W, grid: &Grid, rank: usize, name: &str) -> std::io::Result<()> {
    let cy = grid.rows / 2;
    let title = format!("★ NEW HIGH SCORE, RANK {} ★", rank);
    draw_centered(out, grid, cy.saturating_sub(2), &title, Color::Yellow)?;
    let prompt = format!("Name: {}_", name);
    draw_centered(out, grid, cy, &prompt, Color::White)?;
    draw_centered(out, grid, cy + 2, "ENTER : Save", C_HINT)?;
    Ok(())
}

