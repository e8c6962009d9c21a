/// Drawing: turns a `GameState` into calls on a `Canvas`.
///
/// `render` receives a canvas and an immutable view of the game state.  No
/// game logic is performed; this module only translates state into draw
/// calls.  The game works in logical screen pixels; `TerminalCanvas` scales
/// those onto whatever grid of cells the terminal currently has.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{Assets, Sprite};
use crate::entities::{
    Appearance, Drawable, GameState, GameStatus, Positioned, Rect, SpriteKind,
};
use crate::settings::{Rgb, Settings};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SHIP: Rgb = Rgb(20, 60, 150);
const C_ALIEN: Rgb = Rgb(40, 140, 40);
const C_HUD: Rgb = Rgb(90, 90, 90);
const C_BUTTON: Rgb = Rgb(0, 135, 0);
const C_BUTTON_TEXT: Rgb = Rgb(255, 255, 255);
const C_HINT: Rgb = Rgb(60, 60, 60);

const BUTTON_WIDTH: i32 = 200;
const BUTTON_HEIGHT: i32 = 50;

// ── Drawing surface ───────────────────────────────────────────────────────────

/// The drawing operations the game needs.  Coordinates are logical pixels.
pub trait Canvas {
    /// The visible area, anchored at the origin.
    fn screen_rect(&self) -> Rect;
    fn fill(&mut self, color: Rgb) -> std::io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> std::io::Result<()>;
    /// Draw the sprite's visible characters with their top-left at `rect`.
    fn blit(&mut self, sprite: &Sprite, rect: Rect, color: Rgb) -> std::io::Result<()>;
    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Rgb) -> std::io::Result<()>;
    /// A filled button with its label centred on it.
    fn draw_button(&mut self, rect: Rect, label: &str) -> std::io::Result<()>;
    /// Show everything drawn since the last present.
    fn present(&mut self) -> std::io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame: background, bullets, ship, aliens, then the
/// HUD and, when the game is over, the play-again button.
pub fn render<C: Canvas>(
    canvas: &mut C,
    state: &GameState,
    assets: &Assets,
) -> std::io::Result<()> {
    canvas.fill(state.settings.bg_color)?;

    for bullet in state.bullets.values() {
        draw_entity(canvas, bullet, assets)?;
    }
    draw_entity(canvas, &state.ship, assets)?;
    for alien in state.fleet.aliens.values() {
        draw_entity(canvas, alien, assets)?;
    }

    draw_hud(canvas, state)?;
    if state.status == GameStatus::Inactive {
        draw_play_again(canvas)?;
    }

    canvas.present()
}

fn draw_entity<C: Canvas, E: Drawable>(
    canvas: &mut C,
    entity: &E,
    assets: &Assets,
) -> std::io::Result<()> {
    match entity.appearance() {
        Appearance::Fill(color) => canvas.fill_rect(entity.rect(), color),
        Appearance::Sprite(SpriteKind::Ship) => canvas.blit(&assets.ship, entity.rect(), C_SHIP),
        Appearance::Sprite(SpriteKind::Alien) => {
            canvas.blit(&assets.alien, entity.rect(), C_ALIEN)
        }
    }
}

fn draw_hud<C: Canvas>(canvas: &mut C, state: &GameState) -> std::io::Result<()> {
    let lives = format!("Ships: {}", state.stats.ships_left);
    canvas.draw_text(0, 0, &lives, C_HUD)
}

fn draw_play_again<C: Canvas>(canvas: &mut C) -> std::io::Result<()> {
    let screen = canvas.screen_rect();
    let button = Rect::new(
        screen.center_x() - BUTTON_WIDTH / 2,
        screen.center_y() - BUTTON_HEIGHT / 2,
        BUTTON_WIDTH,
        BUTTON_HEIGHT,
    );
    canvas.draw_button(button, "Play")?;
    canvas.draw_text(
        button.x,
        button.bottom() + BUTTON_HEIGHT / 2,
        "P / Enter - Play   Q - Quit",
        C_HINT,
    )
}

// ── Terminal backend ──────────────────────────────────────────────────────────

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

/// A [`Canvas`] that queues crossterm commands and flushes on `present`.
pub struct TerminalCanvas<W: Write> {
    out: W,
    screen: Rect,
    /// Logical pixels per sprite character.
    cell: (i32, i32),
    columns: u16,
    rows: u16,
    background: Rgb,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, settings: &Settings, columns: u16, rows: u16) -> Self {
        TerminalCanvas {
            out,
            screen: settings.screen_rect(),
            cell: (settings.cell_width as i32, settings.cell_height as i32),
            columns,
            rows,
            background: settings.bg_color,
        }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Terminal cell containing a logical point, if it is on screen.
    fn cell_at(&self, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= self.screen.width || y >= self.screen.height {
            return None;
        }
        let col = x as i64 * self.columns as i64 / self.screen.width as i64;
        let row = y as i64 * self.rows as i64 / self.screen.height as i64;
        Some((col as u16, row as u16))
    }

    /// Half-open cell span covering `[start, end)` logical pixels along one
    /// axis; never empty for a non-empty span that is on screen.
    fn span(start: i32, end: i32, extent: i32, cells: u16) -> (u16, u16) {
        let start = start.clamp(0, extent) as i64;
        let end = end.clamp(0, extent) as i64;
        if end <= start {
            return (0, 0);
        }
        let cells = cells as i64;
        let extent = extent as i64;
        let first = start * cells / extent;
        let last = ((end * cells + extent - 1) / extent).max(first + 1).min(cells);
        (first as u16, last as u16)
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn screen_rect(&self) -> Rect {
        self.screen
    }

    fn fill(&mut self, rgb: Rgb) -> std::io::Result<()> {
        self.background = rgb;
        self.out.queue(style::SetBackgroundColor(color(rgb)))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, rgb: Rgb) -> std::io::Result<()> {
        let (c0, c1) = Self::span(rect.left(), rect.right(), self.screen.width, self.columns);
        let (r0, r1) = Self::span(rect.top(), rect.bottom(), self.screen.height, self.rows);
        if c1 <= c0 || r1 <= r0 {
            return Ok(());
        }

        let run = " ".repeat((c1 - c0) as usize);
        self.out.queue(style::SetBackgroundColor(color(rgb)))?;
        for row in r0..r1 {
            self.out.queue(cursor::MoveTo(c0, row))?;
            self.out.queue(Print(&run))?;
        }
        self.out.queue(style::SetBackgroundColor(color(self.background)))?;
        Ok(())
    }

    fn blit(&mut self, sprite: &Sprite, rect: Rect, rgb: Rgb) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(color(rgb)))?;
        let (cw, ch) = self.cell;
        for (r, line) in sprite.rows().iter().enumerate() {
            for (c, &glyph) in line.iter().enumerate() {
                if glyph == ' ' {
                    continue;
                }
                // Sample the middle of the character's footprint.
                let x = rect.x + c as i32 * cw + cw / 2;
                let y = rect.y + r as i32 * ch + ch / 2;
                if let Some((col, row)) = self.cell_at(x, y) {
                    self.out.queue(cursor::MoveTo(col, row))?;
                    self.out.queue(Print(glyph))?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, rgb: Rgb) -> std::io::Result<()> {
        let Some((col, row)) = self.cell_at(x, y) else {
            return Ok(());
        };
        let room = self.columns.saturating_sub(col) as usize;
        let clipped: String = text.chars().take(room).collect();
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color(rgb)))?;
        self.out.queue(Print(clipped))?;
        Ok(())
    }

    fn draw_button(&mut self, rect: Rect, label: &str) -> std::io::Result<()> {
        self.fill_rect(rect, C_BUTTON)?;

        let Some((_, row)) = self.cell_at(rect.center_x(), rect.center_y()) else {
            return Ok(());
        };
        let (c0, c1) = Self::span(rect.left(), rect.right(), self.screen.width, self.columns);
        let width = label.chars().count() as u16;
        let col = c0 + (c1 - c0).saturating_sub(width) / 2;

        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetBackgroundColor(color(C_BUTTON)))?;
        self.out.queue(style::SetForegroundColor(color(C_BUTTON_TEXT)))?;
        self.out.queue(Print(label))?;
        self.out.queue(style::SetBackgroundColor(color(self.background)))?;
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
