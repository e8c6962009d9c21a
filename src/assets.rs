/// Sprite loading.
///
/// A sprite is a plain-text character grid.  Spaces are transparent; every
/// other character is drawn.  Each character covers `cell_width` ×
/// `cell_height` logical pixels, which is how a sprite acquires the pixel
/// size used for its bounding box.
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};
use crate::settings::Settings;

pub const ALIEN_SPRITE: &str = "alien.txt";
pub const SHIP_SPRITE: &str = "ship.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    /// Rows of equal length, top to bottom.
    rows: Vec<Vec<char>>,
}

impl Sprite {
    /// Parse sprite text.  Trailing blank lines are dropped and short rows
    /// are padded with transparent cells.  `None` when nothing is visible.
    pub fn parse(text: &str) -> Option<Sprite> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        while rows.first().is_some_and(|r| r.is_empty()) {
            rows.remove(0);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        for row in &mut rows {
            row.resize(width, ' ');
        }
        Some(Sprite { rows })
    }

    pub fn load(path: &Path) -> Result<Sprite> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        Sprite::parse(&text).ok_or_else(|| GameError::EmptySprite(path.to_path_buf()))
    }

    /// Width in characters.
    pub fn columns(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Height in characters.
    pub fn lines(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    /// Size in logical pixels.
    pub fn pixel_size(&self, settings: &Settings) -> (i32, i32) {
        (
            (self.columns() as u32 * settings.cell_width) as i32,
            (self.lines() as u32 * settings.cell_height) as i32,
        )
    }

    /// Rotate a quarter turn counter-clockwise.  Directional glyphs are
    /// turned with the grid so an up-pointing ship ends up pointing left.
    pub fn rotated(&self) -> Sprite {
        let cols = self.columns();
        let rows = (0..cols)
            .map(|r| {
                self.rows
                    .iter()
                    .map(|row| rotate_glyph(row[cols - 1 - r]))
                    .collect()
            })
            .collect();
        Sprite { rows }
    }
}

fn rotate_glyph(c: char) -> char {
    match c {
        '^' => '<',
        '<' => 'v',
        'v' => '>',
        '>' => '^',
        '|' => '-',
        '-' => '|',
        '/' => '\\',
        '\\' => '/',
        '▲' => '◀',
        '◀' => '▼',
        '▼' => '▶',
        '▶' => '▲',
        other => other,
    }
}

/// Both sprites the game needs, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Assets {
    pub alien: Sprite,
    /// Already rotated into its on-screen orientation.
    pub ship: Sprite,
}

impl Assets {
    pub fn load(dir: &Path) -> Result<Assets> {
        let alien = Sprite::load(&dir.join(ALIEN_SPRITE))?;
        let ship = Sprite::load(&dir.join(SHIP_SPRITE))?.rotated();
        tracing::info!(
            dir = %dir.display(),
            alien = ?(alien.columns(), alien.lines()),
            ship = ?(ship.columns(), ship.lines()),
            "sprites loaded"
        );
        Ok(Assets { alien, ship })
    }

    pub fn default_dir() -> PathBuf {
        PathBuf::from("assets")
    }
}
