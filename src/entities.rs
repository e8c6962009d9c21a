/// Game entity types and their per-tick update rules.
///
/// Every entity keeps an authoritative floating-point position; its integer
/// bounding box is derived from that position on demand, so the two can
/// never drift apart.
use std::collections::BTreeMap;

use crate::fleet::Fleet;
use crate::settings::{Rgb, Settings};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Integer axis-aligned rectangle in logical screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect { x, y, width, height }
    }

    /// Bounding box for a sub-pixel position: the position is floored.
    pub fn at(x: f32, y: f32, width: i32, height: i32) -> Rect {
        Rect::new(x.floor() as i32, y.floor() as i32, width, height)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    /// True when the interiors overlap.  Rectangles that merely share an
    /// edge do not collide.
    pub fn collides(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Per-tick inputs shared by every entity update.
#[derive(Clone, Copy, Debug)]
pub struct TickContext<'a> {
    pub settings: &'a Settings,
    /// Fleet-wide vertical sign, ±1.
    pub fleet_direction: f32,
}

pub trait Positioned {
    fn position(&self) -> (f32, f32);
    fn size(&self) -> (i32, i32);

    fn rect(&self) -> Rect {
        let (x, y) = self.position();
        let (w, h) = self.size();
        Rect::at(x, y, w, h)
    }
}

pub trait Updatable {
    fn update(&mut self, ctx: &TickContext<'_>);
}

/// Which loaded sprite an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Alien,
    Ship,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Appearance {
    Sprite(SpriteKind),
    Fill(Rgb),
}

pub trait Drawable: Positioned {
    fn appearance(&self) -> Appearance;
}

// ── Entity arena ──────────────────────────────────────────────────────────────

/// Opaque handle for a member of a [`Group`].  Ids are never reused within
/// a group, so a stale id simply finds nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

/// Insertion-ordered collection keyed by [`EntityId`].
///
/// Removal is by id, so collision passes can collect ids first and remove
/// afterwards without disturbing iteration.
#[derive(Clone, Debug)]
pub struct Group<T> {
    next_id: u64,
    members: BTreeMap<EntityId, T>,
}

impl<T> Default for Group<T> {
    fn default() -> Self {
        Group {
            next_id: 0,
            members: BTreeMap::new(),
        }
    }
}

impl<T> Group<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, member: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.members.insert(id, member);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.members.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.members.get(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.members.iter().map(|(id, m)| (*id, m))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.members.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.members.values_mut()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.members.retain(|_, m| keep(m));
    }
}

// ── Ship ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Ship {
    /// A ship of the given size, parked at the middle of the right edge.
    pub fn new(size: (i32, i32), settings: &Settings) -> Ship {
        let mut ship = Ship {
            x: 0.0,
            y: 0.0,
            width: size.0,
            height: size.1,
            moving_up: false,
            moving_down: false,
        };
        ship.center(settings);
        ship
    }

    /// Snap back to the middle of the right edge.  Movement intent survives
    /// so a held key keeps working after a respawn.
    pub fn center(&mut self, settings: &Settings) {
        let screen = settings.screen_rect();
        self.x = (screen.right() - self.width) as f32;
        self.y = (screen.center_y() - self.height / 2) as f32;
    }
}

impl Positioned for Ship {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

impl Updatable for Ship {
    fn update(&mut self, ctx: &TickContext<'_>) {
        let s = ctx.settings;
        let rect = self.rect();
        let floor = s.screen_height as i32 - s.ship_bottom_margin;

        if self.moving_up && rect.top() > 0 {
            self.y -= s.ship_speed;
        }
        if self.moving_down && rect.bottom() < floor {
            self.y += s.ship_speed;
        }

        let lowest = (s.screen_height as i32 - self.height).max(0) as f32;
        self.y = self.y.clamp(0.0, lowest);
    }
}

impl Drawable for Ship {
    fn appearance(&self) -> Appearance {
        Appearance::Sprite(SpriteKind::Ship)
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
    pub color: Rgb,
}

impl Bullet {
    /// A bullet leaving the ship, centred on it.  Bullets fly sideways, so
    /// `bullet_height` is the horizontal extent and `bullet_width` the
    /// vertical one.
    pub fn from_ship(ship: &Ship, settings: &Settings) -> Bullet {
        let ship_rect = ship.rect();
        let width = settings.bullet_height as i32;
        let height = settings.bullet_width as i32;
        Bullet {
            x: (ship_rect.center_x() - width / 2) as f32,
            y: (ship_rect.center_y() - height / 2) as f32,
            width,
            height,
            color: settings.bullet_color,
        }
    }

    /// True once the bullet has crossed the left edge.
    pub fn is_off_screen(&self) -> bool {
        self.rect().left() < 0
    }
}

impl Positioned for Bullet {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

impl Updatable for Bullet {
    fn update(&mut self, ctx: &TickContext<'_>) {
        self.x -= ctx.settings.bullet_speed;
    }
}

impl Drawable for Bullet {
    fn appearance(&self) -> Appearance {
        Appearance::Fill(self.color)
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub width: i32,
    pub height: i32,
}

impl Alien {
    pub fn new(x: f32, y: f32, size: (i32, i32)) -> Alien {
        Alien {
            x,
            y,
            width: size.0,
            height: size.1,
        }
    }

    /// True when the alien touches the top or bottom of `screen`.
    pub fn check_edges(&self, screen: &Rect) -> bool {
        let rect = self.rect();
        rect.bottom() >= screen.bottom() || rect.top() <= screen.top()
    }
}

impl Positioned for Alien {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }
}

impl Updatable for Alien {
    fn update(&mut self, ctx: &TickContext<'_>) {
        self.y += ctx.settings.alien_speed * ctx.fleet_direction;
    }
}

impl Drawable for Alien {
    fn appearance(&self) -> Appearance {
        Appearance::Sprite(SpriteKind::Alien)
    }
}

// ── Stats & status ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameStats {
    pub ships_left: u32,
}

impl GameStats {
    pub fn new(settings: &Settings) -> GameStats {
        GameStats {
            ships_left: settings.ship_limit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    /// Terminal state: nothing moves until the player asks to play again.
    Inactive,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so the update functions in
/// [`crate::compute`] can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: Settings,
    pub ship: Ship,
    pub bullets: Group<Bullet>,
    pub fleet: Fleet,
    pub stats: GameStats,
    pub status: GameStatus,
    /// Ticks of frozen gameplay left after a hit.
    pub pause_ticks: u32,
    pub frame: u64,
}
