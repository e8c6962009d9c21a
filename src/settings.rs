/// Game configuration.
///
/// Loaded once at startup and passed by reference everywhere afterwards.
/// Any subset of fields may be overridden from a TOML file; missing fields
/// fall back to the defaults below.
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::entities::Rect;
use crate::error::{GameError, Result};

/// Largest screen, bullet or per-tick movement extent, in logical pixels.
const MAX_EXTENT: u32 = 1 << 16;
/// Largest sprite character footprint, in logical pixels.
const MAX_CELL: u32 = 1024;
const MAX_FPS: u32 = 1000;
const MAX_HIT_PAUSE_MS: u64 = 60_000;

/// 24-bit colour, written as `[r, g, b]` in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    // ── Screen ───────────────────────────────────────────────────────────────
    pub screen_width: u32,
    pub screen_height: u32,
    pub bg_color: Rgb,

    // ── Bullets ──────────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    /// Vertical extent of a bullet.
    pub bullet_width: u32,
    /// Horizontal extent of a bullet (bullets fly sideways).
    pub bullet_height: u32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_speed: f32,
    /// Sideways shift toward the ship each time the fleet bounces.
    pub drop_speed: i32,
    /// Initial fleet direction: 1 moves down the screen, -1 up.
    pub fleet_direction: i8,
    pub fleet_column_limit: u32,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_limit: u32,
    pub ship_speed: f32,
    pub ship_bottom_margin: i32,

    // ── Timing ───────────────────────────────────────────────────────────────
    pub fps: u32,
    pub hit_pause_ms: u64,

    // ── Sprite scale ─────────────────────────────────────────────────────────
    /// Logical pixels covered by one sprite character, horizontally.
    pub cell_width: u32,
    /// Logical pixels covered by one sprite character, vertically.
    pub cell_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            screen_width: 1200,
            screen_height: 800,
            bg_color: Rgb(230, 230, 230),

            bullet_speed: 15.0,
            bullet_width: 3,
            bullet_height: 15,
            bullet_color: Rgb(60, 60, 60),
            bullets_allowed: 3,

            alien_speed: 3.0,
            drop_speed: 10,
            fleet_direction: 1,
            fleet_column_limit: 8,

            ship_limit: 3,
            ship_speed: 3.0,
            ship_bottom_margin: 15,

            fps: 60,
            hit_pause_ms: 500,

            cell_width: 10,
            cell_height: 20,
        }
    }
}

impl Settings {
    /// Read and validate a TOML settings file.
    pub fn load(path: &Path) -> Result<Settings> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Settings::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the game cannot run with.  Every bound keeps the
    /// per-tick pixel arithmetic inside `i32`.
    pub fn validate(&self) -> Result<()> {
        fn reject(field: &'static str, reason: &'static str) -> Result<()> {
            Err(GameError::InvalidSettings { field, reason })
        }
        // NaN and infinities fail this too.
        fn speed_ok(v: f32) -> bool {
            v.is_finite() && v > 0.0 && v <= MAX_EXTENT as f32
        }
        fn extent_ok(v: u32) -> bool {
            v > 0 && v <= MAX_EXTENT
        }

        if !extent_ok(self.screen_width) {
            return reject("screen_width", "must be between 1 and 65536");
        }
        if !extent_ok(self.screen_height) {
            return reject("screen_height", "must be between 1 and 65536");
        }
        if self.fps == 0 || self.fps > MAX_FPS {
            return reject("fps", "must be between 1 and 1000");
        }
        if self.hit_pause_ms > MAX_HIT_PAUSE_MS {
            return reject("hit_pause_ms", "must be at most 60000");
        }
        if self.cell_width == 0 || self.cell_width > MAX_CELL {
            return reject("cell_width", "must be between 1 and 1024");
        }
        if self.cell_height == 0 || self.cell_height > MAX_CELL {
            return reject("cell_height", "must be between 1 and 1024");
        }
        if !extent_ok(self.bullet_width) {
            return reject("bullet_width", "must be between 1 and 65536");
        }
        if !extent_ok(self.bullet_height) {
            return reject("bullet_height", "must be between 1 and 65536");
        }
        if !speed_ok(self.bullet_speed) {
            return reject("bullet_speed", "must be positive, finite and at most 65536");
        }
        if !speed_ok(self.alien_speed) {
            return reject("alien_speed", "must be positive, finite and at most 65536");
        }
        if !speed_ok(self.ship_speed) {
            return reject("ship_speed", "must be positive, finite and at most 65536");
        }
        if !(0..=MAX_EXTENT as i32).contains(&self.drop_speed) {
            return reject("drop_speed", "must be between 0 and 65536");
        }
        if self.ship_bottom_margin.unsigned_abs() > MAX_EXTENT {
            return reject("ship_bottom_margin", "must be within 65536 of zero");
        }
        if self.fleet_direction != 1 && self.fleet_direction != -1 {
            return reject("fleet_direction", "must be 1 or -1");
        }
        Ok(())
    }

    /// The visible playing field in logical pixels, anchored at the origin.
    pub fn screen_rect(&self) -> Rect {
        Rect::new(0, 0, self.screen_width as i32, self.screen_height as i32)
    }

    /// Target wall-clock length of one tick.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps as u64)
    }

    /// The post-hit pause expressed in whole ticks (rounded up).
    pub fn hit_pause_ticks(&self) -> u32 {
        let ticks = (self.hit_pause_ms * self.fps as u64).div_ceil(1000);
        ticks as u32
    }
}
