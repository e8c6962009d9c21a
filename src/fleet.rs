/// The alien fleet: grid layout, the shared direction sign and the
/// bounce rule.
use crate::entities::{Alien, Group, Positioned, TickContext, Updatable};
use crate::settings::Settings;

#[derive(Clone, Debug)]
pub struct Fleet {
    pub aliens: Group<Alien>,
    /// ±1, applied to every alien's vertical speed.
    pub direction: i8,
    /// Pixel size of one alien, taken from its sprite.
    pub alien_size: (i32, i32),
}

impl Fleet {
    pub fn new(settings: &Settings, alien_size: (i32, i32)) -> Fleet {
        Fleet {
            aliens: build_fleet(settings, alien_size),
            direction: settings.fleet_direction,
            alien_size,
        }
    }

    /// Replace every alien with a fresh grid.  The direction carries over.
    pub fn rebuild(&mut self, settings: &Settings) {
        self.aliens = build_fleet(settings, self.alien_size);
        tracing::info!(aliens = self.aliens.len(), "fleet built");
    }

    /// Bounce the whole fleet if any alien touches the top or bottom.
    /// Returns whether a bounce happened.
    pub fn check_edges(&mut self, settings: &Settings) -> bool {
        let screen = settings.screen_rect();
        if self.aliens.values().any(|a| a.check_edges(&screen)) {
            self.change_direction(settings);
            true
        } else {
            false
        }
    }

    /// Shift every alien toward the ship and reverse the vertical sign.
    pub fn change_direction(&mut self, settings: &Settings) {
        for alien in self.aliens.values_mut() {
            alien.x += settings.drop_speed as f32;
        }
        self.direction = -self.direction;
        tracing::debug!(direction = self.direction, "fleet bounced");
    }

    pub fn update(&mut self, settings: &Settings) {
        let ctx = TickContext {
            settings,
            fleet_direction: self.direction as f32,
        };
        for alien in self.aliens.values_mut() {
            alien.update(&ctx);
        }
    }

    /// True once any alien's right edge reaches the ship's side.
    pub fn breached(&self, settings: &Settings) -> bool {
        let edge = settings.screen_rect().right();
        self.aliens.values().any(|a| a.rect().right() >= edge)
    }
}

/// Lay out a column-major grid of aliens.
///
/// Columns start one alien-width in and step by two widths; rows start one
/// alien-height down and step by two heights.  A column is filled while the
/// next alien would start above `screen_height - 2h`; columns stop at
/// `screen_width - 3w` or after `fleet_column_limit` of them.
pub fn build_fleet(settings: &Settings, alien_size: (i32, i32)) -> Group<Alien> {
    let (w, h) = alien_size;
    let mut aliens = Group::new();
    if w <= 0 || h <= 0 {
        return aliens;
    }

    let screen_w = settings.screen_width as i32;
    let screen_h = settings.screen_height as i32;

    let mut x = w;
    let mut column = 0;
    while x < screen_w - 3 * w && column < settings.fleet_column_limit {
        let mut y = h;
        while y < screen_h - 2 * h {
            aliens.insert(Alien::new(x as f32, y as f32, alien_size));
            y += 2 * h;
        }
        x += 2 * w;
        column += 1;
    }
    aliens
}
