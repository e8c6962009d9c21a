use alien_invasion::compute::*;
use alien_invasion::entities::*;
use alien_invasion::input::Command;
use alien_invasion::settings::{Rgb, Settings};

const ALIEN: (i32, i32) = (60, 60);
const SHIP: (i32, i32) = (30, 100);

fn make_state() -> GameState {
    init_state(Settings::default(), ALIEN, SHIP)
}

fn bullet_at(x: f32, y: f32) -> Bullet {
    Bullet {
        x,
        y,
        width: 15,
        height: 3,
        color: Rgb(60, 60, 60),
    }
}

/// An alien whose right edge sits on the right screen edge, clear of the ship.
fn add_breaching_alien(state: &mut GameState) {
    state.fleet.aliens.insert(Alien::new(1140.0, 150.0, ALIEN));
}

fn drain_pause(mut state: GameState) -> GameState {
    while state.pause_ticks > 0 {
        state = tick(&state);
    }
    state
}

fn alien_positions(state: &GameState) -> Vec<(f32, f32)> {
    state.fleet.aliens.values().map(|a| (a.x, a.y)).collect()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_parks_ship_mid_right() {
    let s = make_state();
    assert_eq!(s.ship.x, 1170.0); // screen_width - ship width
    assert_eq!(s.ship.y, 350.0); // screen centre - half ship height
    assert!(!s.ship.moving_up);
    assert!(!s.ship.moving_down);
}

#[test]
fn init_state_starts_active_with_full_fleet() {
    let s = make_state();
    assert_eq!(s.status, GameStatus::Active);
    assert_eq!(s.stats.ships_left, 3);
    assert_eq!(s.fleet.aliens.len(), 48); // 8 columns × 6 rows
    assert_eq!(s.fleet.direction, 1);
    assert!(s.bullets.is_empty());
    assert_eq!(s.pause_ticks, 0);
    assert_eq!(s.frame, 0);
}

// ── fire_bullet ───────────────────────────────────────────────────────────────

#[test]
fn fire_adds_bullet_centred_on_ship() {
    let s = make_state();
    let s2 = fire_bullet(&s);
    assert_eq!(s2.bullets.len(), 1);
    let b = s2.bullets.values().next().unwrap();
    assert_eq!((b.x, b.y), (1178.0, 399.0));
    assert_eq!((b.width, b.height), (15, 3));
    assert_eq!(b.color, Rgb(60, 60, 60));
}

#[test]
fn fire_rejected_at_bullet_cap() {
    let mut s = make_state();
    for _ in 0..3 {
        s = fire_bullet(&s);
    }
    assert_eq!(s.bullets.len(), 3);

    let before: Vec<_> = s.bullets.iter().map(|(id, b)| (id, b.x, b.y)).collect();
    let s2 = fire_bullet(&s);
    let after: Vec<_> = s2.bullets.iter().map(|(id, b)| (id, b.x, b.y)).collect();
    assert_eq!(before, after);
}

#[test]
fn fire_does_not_mutate_original() {
    let s = make_state();
    let _ = fire_bullet(&s);
    assert!(s.bullets.is_empty());
}

#[test]
fn fire_ignored_while_paused_or_inactive() {
    let mut s = make_state();
    s.pause_ticks = 5;
    assert!(fire_bullet(&s).bullets.is_empty());

    let mut s = make_state();
    s.status = GameStatus::Inactive;
    assert!(fire_bullet(&s).bullets.is_empty());
}

// ── tick: bullets ─────────────────────────────────────────────────────────────

#[test]
fn tick_moves_bullets_left() {
    let mut s = make_state();
    s = fire_bullet(&s);
    let s2 = tick(&s);
    let b = s2.bullets.values().next().unwrap();
    assert_eq!(b.x, 1178.0 - 15.0);
}

#[test]
fn bullet_removed_exactly_when_x_turns_negative() {
    // Left of the fleet, so nothing can be hit on the way out.
    let mut s = make_state();
    s.bullets.insert(bullet_at(15.0, 150.0));

    let s2 = tick(&s);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.bullets.values().next().unwrap().x, 0.0);

    let s3 = tick(&s2);
    assert!(s3.bullets.is_empty());
}

// ── tick: bullet ↔ alien ──────────────────────────────────────────────────────

#[test]
fn bullet_and_alien_removed_together() {
    let mut s = make_state();
    let (target, _) = s
        .fleet
        .aliens
        .iter()
        .find(|(_, a)| (a.x, a.y) == (60.0, 60.0))
        .unwrap();
    // Moves to x=85 this tick, inside the alien at (60..120, 60..120).
    s.bullets.insert(bullet_at(100.0, 80.0));

    let s2 = tick(&s);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.fleet.aliens.len(), 47);
    assert!(s2.fleet.aliens.get(target).is_none());
}

#[test]
fn every_bullet_in_a_collision_is_spent() {
    let mut s = make_state();
    s.bullets.insert(bullet_at(100.0, 80.0));
    s.bullets.insert(bullet_at(100.0, 100.0));

    let s2 = tick(&s);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.fleet.aliens.len(), 47);
}

#[test]
fn missing_bullet_leaves_fleet_alone() {
    let mut s = make_state();
    // Between the first two rows of aliens.
    s.bullets.insert(bullet_at(100.0, 150.0));

    let s2 = tick(&s);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.fleet.aliens.len(), 48);
}

#[test]
fn clearing_the_fleet_starts_a_new_wave_same_tick() {
    let mut s = make_state();
    s.fleet.aliens.clear();
    s.fleet.aliens.insert(Alien::new(60.0, 60.0, ALIEN));
    s.bullets.insert(bullet_at(100.0, 80.0));
    s.bullets.insert(bullet_at(600.0, 150.0));

    let s2 = tick(&s);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.fleet.aliens.len(), 48);
    assert_eq!(s2.stats.ships_left, 3);
}

// ── tick: ship hit ────────────────────────────────────────────────────────────

#[test]
fn breach_costs_a_life_and_resets_the_round() {
    let mut s = make_state();
    s.ship.y = 100.0;
    s.bullets.insert(bullet_at(500.0, 150.0));
    add_breaching_alien(&mut s);

    let s2 = tick(&s);
    assert_eq!(s2.stats.ships_left, 2);
    assert_eq!(s2.status, GameStatus::Active);
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.fleet.aliens.len(), 48);
    assert_eq!((s2.ship.x, s2.ship.y), (1170.0, 350.0));
    assert_eq!(s2.pause_ticks, 30); // 500 ms at 60 fps
}

#[test]
fn alien_ramming_ship_costs_a_life() {
    let mut s = make_state();
    // Overlaps the ship at (1170..1200, 350..450) without reaching the edge.
    s.fleet.aliens.insert(Alien::new(1120.0, 380.0, ALIEN));

    let s2 = tick(&s);
    assert_eq!(s2.stats.ships_left, 2);
}

#[test]
fn nothing_moves_during_hit_pause() {
    let mut s = make_state();
    add_breaching_alien(&mut s);
    let mut s = tick(&s);
    s.ship.moving_up = true;

    let ship_y = s.ship.y;
    let aliens = alien_positions(&s);
    for remaining in (0..30).rev() {
        s = tick(&s);
        assert_eq!(s.pause_ticks, remaining);
        assert_eq!(s.ship.y, ship_y);
        assert_eq!(alien_positions(&s), aliens);
    }

    // First tick after the pause moves again.
    let s = tick(&s);
    assert!(s.ship.y < ship_y);
}

#[test]
fn hit_after_the_last_spare_ship_ends_the_game() {
    let mut s = make_state();
    for expected in [2, 1, 0] {
        add_breaching_alien(&mut s);
        s = tick(&s);
        assert_eq!(s.stats.ships_left, expected);
        assert_eq!(s.status, GameStatus::Active);
        assert_eq!(s.fleet.aliens.len(), 48);
        assert_eq!(s.pause_ticks, 30);
        s = drain_pause(s);
    }

    add_breaching_alien(&mut s);
    s = tick(&s);
    assert_eq!(s.stats.ships_left, 0);
    assert_eq!(s.status, GameStatus::Inactive);

    // Frozen from here on.
    s.ship.moving_up = true;
    let ship_y = s.ship.y;
    let aliens = alien_positions(&s);
    for _ in 0..10 {
        s = tick(&s);
    }
    assert_eq!(s.ship.y, ship_y);
    assert_eq!(alien_positions(&s), aliens);
}

#[test]
fn largest_settings_run_without_overflow() {
    let settings = Settings::from_toml_str(
        "screen_width = 65536\nscreen_height = 65536\nalien_speed = 65536.0\n\
         bullet_speed = 65536.0\nship_speed = 65536.0\ndrop_speed = 65536\n\
         ship_bottom_margin = -65536\n",
    )
    .unwrap();
    let mut s = init_state(settings, ALIEN, SHIP);
    s.ship.moving_down = true;
    for _ in 0..500 {
        s = fire_bullet(&tick(&s));
        let lowest = s.settings.screen_height as f32 - s.ship.height as f32;
        assert!((0.0..=lowest).contains(&s.ship.y));
    }
}

#[test]
fn hit_on_the_last_ship_still_resets_the_round() {
    let mut s = make_state();
    s.stats.ships_left = 1;
    s.ship.y = 100.0;
    add_breaching_alien(&mut s);

    let s2 = tick(&s);
    assert_eq!(s2.stats.ships_left, 0);
    assert_eq!(s2.status, GameStatus::Active);
    assert_eq!(s2.fleet.aliens.len(), 48);
    assert_eq!((s2.ship.x, s2.ship.y), (1170.0, 350.0));
    assert_eq!(s2.pause_ticks, 30);
}

#[test]
fn ship_hit_with_no_lives_left_is_game_over() {
    let mut s = make_state();
    s.stats.ships_left = 0;
    add_breaching_alien(&mut s);
    let s2 = ship_hit(&s);
    assert_eq!(s2.stats.ships_left, 0);
    assert_eq!(s2.status, GameStatus::Inactive);
    assert_eq!(s2.pause_ticks, 0);
    // The final round stays on screen.
    assert_eq!(s2.fleet.aliens.len(), 49);
}

// ── commands & step ───────────────────────────────────────────────────────────

#[test]
fn movement_commands_set_and_clear_flags() {
    let s = make_state();
    let s = apply_command(&s, Command::MoveUp(true));
    assert!(s.ship.moving_up);
    let s = apply_command(&s, Command::MoveDown(true));
    assert!(s.ship.moving_down);
    let s = apply_command(&s, Command::MoveUp(false));
    assert!(!s.ship.moving_up);
    assert!(s.ship.moving_down);
}

#[test]
fn step_applies_commands_before_advancing() {
    let s = make_state();
    let Step::Continue(s2) = step(&s, &[Command::MoveUp(true), Command::Fire]) else {
        panic!("unexpected quit");
    };
    assert_eq!(s2.ship.y, 347.0);
    assert_eq!(s2.bullets.len(), 1);
    assert_eq!(s2.frame, 1);
}

#[test]
fn step_quits_immediately() {
    let s = make_state();
    assert!(matches!(step(&s, &[Command::Fire, Command::Quit]), Step::Quit));

    let mut s = make_state();
    s.status = GameStatus::Inactive;
    assert!(matches!(step(&s, &[Command::Quit]), Step::Quit));
}

#[test]
fn play_again_only_after_game_over() {
    let mut s = make_state();
    s.stats.ships_left = 2;
    let s2 = apply_command(&s, Command::PlayAgain);
    assert_eq!(s2.stats.ships_left, 2);

    s.status = GameStatus::Inactive;
    s.stats.ships_left = 0;
    s.fleet.aliens.clear();
    s.bullets.insert(bullet_at(500.0, 150.0));
    let s3 = apply_command(&s, Command::PlayAgain);
    assert_eq!(s3.status, GameStatus::Active);
    assert_eq!(s3.stats.ships_left, 3);
    assert_eq!(s3.fleet.aliens.len(), 48);
    assert!(s3.bullets.is_empty());
    assert_eq!((s3.ship.x, s3.ship.y), (1170.0, 350.0));
}

#[test]
fn restart_does_not_mutate_original() {
    let mut s = make_state();
    s.status = GameStatus::Inactive;
    s.stats.ships_left = 0;
    let _ = restart(&s);
    assert_eq!(s.status, GameStatus::Inactive);
    assert_eq!(s.stats.ships_left, 0);
}
