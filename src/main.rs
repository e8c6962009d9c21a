use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::filter::EnvFilter;

use alien_invasion::assets::Assets;
use alien_invasion::compute::{init_state, step, Step};
use alien_invasion::display::{render, TerminalCanvas};
use alien_invasion::entities::GameState;
use alien_invasion::error::GameError;
use alien_invasion::input::KeyHold;
use alien_invasion::settings::Settings;

#[derive(Parser)]
#[command(name = "alien_invasion")]
#[command(about = "Hold off a descending alien fleet from the right edge of the screen")]
struct Args {
    /// TOML file overriding any of the default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding alien.txt and ship.txt
    #[arg(long, default_value_os_t = Assets::default_dir())]
    assets: PathBuf,

    /// Write logs here (filtered by RUST_LOG, default `info`)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs only go to a file, and only
/// when one is asked for.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.  Each frame drains pending input without
/// blocking, advances the game one tick, draws it, then sleeps off the rest
/// of the frame.
fn game_loop<W: Write>(
    out: W,
    mut state: GameState,
    assets: &Assets,
    release_events: bool,
) -> Result<()> {
    let (columns, rows) = terminal::size().map_err(GameError::Terminal)?;
    let mut canvas = TerminalCanvas::new(out, &state.settings, columns, rows);
    let mut keys = KeyHold::new(release_events);
    let frame = state.settings.frame_duration();

    loop {
        let frame_start = Instant::now();

        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(columns, rows) = ev {
                canvas.resize(columns, rows);
                continue;
            }
            commands.extend(keys.translate(&ev, frame_start));
        }
        commands.extend(keys.expire(frame_start));

        state = match step(&state, &commands) {
            Step::Continue(next) => next,
            Step::Quit => return Ok(()),
        };

        render(&mut canvas, &state, assets)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let assets = Assets::load(&args.assets)?;
    let alien_size = assets.alien.pixel_size(&settings);
    let ship_size = assets.ship.pixel_size(&settings);
    let state = init_state(settings, alien_size, ship_size);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().map_err(GameError::Terminal)?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events where the terminal supports them; the
    // others fall back to KeyHold's expiry window.
    let release_events = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    tracing::info!(release_events, "terminal ready");

    let result = game_loop(&mut out, state, &assets, release_events);

    // Always restore the terminal
    if release_events {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
