/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new one.  Nothing here touches the
/// terminal or the clock: time advances only through `step`.
use std::collections::BTreeSet;

use tracing::{debug, info, trace};

use crate::entities::{
    Bullet, GameState, GameStats, GameStatus, Group, Positioned, Ship, TickContext, Updatable,
};
use crate::fleet::Fleet;
use crate::input::Command;
use crate::settings::Settings;

/// Result of advancing one frame.
#[derive(Clone, Debug)]
pub enum Step {
    Continue(GameState),
    Quit,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state from validated settings and the pixel
/// sizes of the alien and ship sprites.
pub fn init_state(
    settings: Settings,
    alien_size: (i32, i32),
    ship_size: (i32, i32),
) -> GameState {
    let fleet = Fleet::new(&settings, alien_size);
    info!(aliens = fleet.aliens.len(), lives = settings.ship_limit, "new game");
    GameState {
        ship: Ship::new(ship_size, &settings),
        bullets: Group::new(),
        fleet,
        stats: GameStats::new(&settings),
        status: GameStatus::Active,
        pause_ticks: 0,
        frame: 0,
        settings,
    }
}

// ── Input-driven state transitions ───────────────────────────────────────────

/// Fire a bullet from the ship unless the bullet cap is already reached.
pub fn fire_bullet(state: &GameState) -> GameState {
    let mut next = state.clone();
    fire(&mut next);
    next
}

/// Apply a single non-quit command.  `Quit` is handled by [`step`].
pub fn apply_command(state: &GameState, command: Command) -> GameState {
    let mut next = state.clone();
    apply(&mut next, command);
    next
}

/// Start over after a game over: full lives, fresh fleet, no bullets.
pub fn restart(state: &GameState) -> GameState {
    let mut next = state.clone();
    reset_round(&mut next);
    next.stats = GameStats::new(&next.settings);
    next.status = GameStatus::Active;
    next.pause_ticks = 0;
    info!(lives = next.stats.ships_left, "play again");
    next
}

/// Resolve the ship being hit, exactly as if an alien had reached it.
pub fn ship_hit(state: &GameState) -> GameState {
    let mut next = state.clone();
    hit(&mut next);
    next
}

// ── Per-frame ────────────────────────────────────────────────────────────────

/// Advance gameplay by one tick.  Inactive games do not move; during the
/// post-hit pause only the countdown moves.
pub fn tick(state: &GameState) -> GameState {
    let mut next = state.clone();
    advance(&mut next);
    next
}

/// One complete frame: apply the commands in order, then advance gameplay.
/// A `Quit` anywhere in `commands` ends the game immediately.
pub fn step(state: &GameState, commands: &[Command]) -> Step {
    let mut next = state.clone();
    for &command in commands {
        if command == Command::Quit {
            info!(frame = next.frame, "quit");
            return Step::Quit;
        }
        apply(&mut next, command);
    }
    advance(&mut next);
    Step::Continue(next)
}

// ── In-place rules ───────────────────────────────────────────────────────────

fn apply(state: &mut GameState, command: Command) {
    match command {
        Command::MoveUp(held) => state.ship.moving_up = held,
        Command::MoveDown(held) => state.ship.moving_down = held,
        Command::Fire => fire(state),
        Command::PlayAgain if state.status == GameStatus::Inactive => *state = restart(state),
        Command::PlayAgain | Command::Quit => {}
    }
}

fn fire(state: &mut GameState) {
    if state.status != GameStatus::Active || state.pause_ticks > 0 {
        return;
    }
    if state.bullets.len() >= state.settings.bullets_allowed {
        debug!(live = state.bullets.len(), "fire rejected, bullet cap reached");
        return;
    }
    let bullet = Bullet::from_ship(&state.ship, &state.settings);
    state.bullets.insert(bullet);
}

fn advance(state: &mut GameState) {
    state.frame += 1;
    if state.status != GameStatus::Active {
        return;
    }
    if state.pause_ticks > 0 {
        state.pause_ticks -= 1;
        return;
    }

    let ctx = TickContext {
        settings: &state.settings,
        fleet_direction: state.fleet.direction as f32,
    };
    state.ship.update(&ctx);

    update_bullets(state);
    update_aliens(state);
}

fn update_bullets(state: &mut GameState) {
    let ctx = TickContext {
        settings: &state.settings,
        fleet_direction: state.fleet.direction as f32,
    };
    for bullet in state.bullets.values_mut() {
        bullet.update(&ctx);
    }

    let before = state.bullets.len();
    state.bullets.retain(|b| !b.is_off_screen());
    let reaped = before - state.bullets.len();
    if reaped > 0 {
        trace!(reaped, "bullets left the screen");
    }

    check_bullet_alien_collisions(state);
}

/// Remove every bullet and every alien that take part in an overlap.  When
/// that clears the fleet, the remaining bullets go too and a new wave starts.
fn check_bullet_alien_collisions(state: &mut GameState) {
    let mut spent_bullets = BTreeSet::new();
    let mut dead_aliens = BTreeSet::new();

    for (bullet_id, bullet) in state.bullets.iter() {
        let bullet_rect = bullet.rect();
        for (alien_id, alien) in state.fleet.aliens.iter() {
            if bullet_rect.collides(&alien.rect()) {
                spent_bullets.insert(bullet_id);
                dead_aliens.insert(alien_id);
            }
        }
    }

    for id in spent_bullets {
        state.bullets.remove(id);
    }
    for id in dead_aliens {
        state.fleet.aliens.remove(id);
    }

    if state.fleet.aliens.is_empty() {
        debug!(frame = state.frame, "wave cleared");
        state.bullets.clear();
        state.fleet.rebuild(&state.settings);
    }
}

fn update_aliens(state: &mut GameState) {
    state.fleet.check_edges(&state.settings);
    state.fleet.update(&state.settings);

    let ship_rect = state.ship.rect();
    let rammed = state
        .fleet
        .aliens
        .values()
        .any(|a| a.rect().collides(&ship_rect));

    if rammed || state.fleet.breached(&state.settings) {
        hit(state);
    }
}

/// A hit with a spare ship left costs that ship and restarts the round.
/// A hit with none left ends the game.
fn hit(state: &mut GameState) {
    if state.stats.ships_left == 0 {
        state.status = GameStatus::Inactive;
        info!(frame = state.frame, "game over");
        return;
    }

    state.stats.ships_left -= 1;
    info!(lives = state.stats.ships_left, "ship hit");
    reset_round(state);
    state.pause_ticks = state.settings.hit_pause_ticks();
}

/// Clear bullets, rebuild the fleet and recenter the ship.
fn reset_round(state: &mut GameState) {
    state.bullets.clear();
    state.fleet.rebuild(&state.settings);
    state.ship.center(&state.settings);
}
