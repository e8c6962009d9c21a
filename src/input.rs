/// Keyboard input → game commands.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): real `Press` /
///   `Repeat` / `Release` events, so movement flags follow the keys exactly.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows up as
///   repeated presses).  A movement key counts as held while its presses
///   keep arriving within `HOLD_WINDOW` (`FIRST_HOLD_WINDOW` before the
///   first repeat); once they stop, a synthetic release is emitted.
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// How long a movement key stays held after a repeat press when the
/// terminal does not report releases.  Longer than common auto-repeat
/// intervals (30 to 50 ms).
pub const HOLD_WINDOW: Duration = Duration::from_millis(133);

/// How long a movement key stays held after its first press.  Auto-repeat
/// only starts after an initial delay (usually 250 to 660 ms), so the first
/// press has to bridge that gap.  A quick tap moves the ship for this long.
pub const FIRST_HOLD_WINDOW: Duration = Duration::from_millis(700);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Set or clear the ship's moving-up flag.
    MoveUp(bool),
    /// Set or clear the ship's moving-down flag.
    MoveDown(bool),
    Fire,
    PlayAgain,
    Quit,
}

/// Translate one terminal event, ignoring key-hold bookkeeping.
pub fn command_for(event: &Event) -> Option<Command> {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = event
    else {
        return None;
    };

    let pressed = matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat);
    match code {
        KeyCode::Up => Some(Command::MoveUp(pressed)),
        KeyCode::Down => Some(Command::MoveDown(pressed)),
        _ if *kind != KeyEventKind::Press => None,
        KeyCode::Char(' ') => Some(Command::Fire),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => Some(Command::PlayAgain),
        _ => None,
    }
}

/// Tracks held movement keys so classic terminals get releases too.
#[derive(Clone, Debug)]
pub struct KeyHold {
    release_events: bool,
    up: Option<Held>,
    down: Option<Held>,
}

/// When a movement key was last pressed and whether it has repeated yet.
#[derive(Clone, Copy, Debug)]
struct Held {
    seen: Instant,
    repeating: bool,
}

impl Held {
    fn refresh(previous: Option<Held>, now: Instant) -> Held {
        Held {
            seen: now,
            repeating: previous.is_some(),
        }
    }

    fn lapsed(&self, now: Instant) -> bool {
        let window = if self.repeating {
            HOLD_WINDOW
        } else {
            FIRST_HOLD_WINDOW
        };
        now.saturating_duration_since(self.seen) > window
    }
}

impl KeyHold {
    /// `release_events` is whether the terminal reports key releases itself.
    pub fn new(release_events: bool) -> KeyHold {
        KeyHold {
            release_events,
            up: None,
            down: None,
        }
    }

    /// Translate an event that arrived at `now`, remembering when each
    /// movement key was last pressed.
    pub fn translate(&mut self, event: &Event, now: Instant) -> Option<Command> {
        let command = command_for(event)?;
        match command {
            Command::MoveUp(held) => self.up = held.then(|| Held::refresh(self.up, now)),
            Command::MoveDown(held) => self.down = held.then(|| Held::refresh(self.down, now)),
            _ => {}
        }
        Some(command)
    }

    /// Releases for movement keys whose presses have dried up.  Always empty
    /// when the terminal reports releases itself.
    pub fn expire(&mut self, now: Instant) -> Vec<Command> {
        if self.release_events {
            return Vec::new();
        }

        let stale = |key: &mut Option<Held>| match *key {
            Some(held) if held.lapsed(now) => {
                *key = None;
                true
            }
            _ => false,
        };

        let mut released = Vec::new();
        if stale(&mut self.up) {
            released.push(Command::MoveUp(false));
        }
        if stale(&mut self.down) {
            released.push(Command::MoveDown(false));
        }
        released
    }
}
