mod terminal;

use std::cell::Cell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal as term, ExecutableCommand,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dino_runner::autopilot;
use dino_runner::engine::NOMINAL_FRAME_MS;
use dino_runner::sprites::{ImageSlot, SpriteRegions};
use dino_runner::surface::{Recorder, Surface};
use dino_runner::{Engine, EngineError, GameConfig};

use terminal::{TerminalSurface, SHEET_IMAGE};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Debug, Parser)]
#[command(name = "dino_runner", about = "Endless runner in the terminal")]
struct Args {
    /// JSON file overriding game constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Run the autopilot without a terminal UI.
    #[arg(long)]
    headless: bool,

    /// Ticks to simulate in headless mode.
    #[arg(long, default_value_t = 10_000)]
    ticks: u64,

    /// Start with hitbox outlines on.
    #[arg(long)]
    debug: bool,

    /// Write logs here while the terminal UI runs.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Where the best score is kept between sessions.
    #[arg(long)]
    score_file: Option<PathBuf>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn init_logging(args: &Args) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else if let Some(path) = &args.log_file {
        // stdout belongs to the game screen
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }
    Ok(())
}

// ── High-score persistence ────────────────────────────────────────────────────

fn high_score_path(args: &Args) -> PathBuf {
    args.score_file.clone().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".dino_runner_score")
    })
}

fn load_high_score(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn save_high_score(path: &Path, score: u32) {
    if let Err(err) = std::fs::write(path, score.to_string()) {
        warn!(path = %path.display(), %err, "could not save high score");
    }
}

// ── Headless run ──────────────────────────────────────────────────────────────

fn run_headless(args: &Args, config: GameConfig) -> Result<(), EngineError> {
    let surface = Recorder::new(config.surface.width, config.surface.height);
    let mut engine = Engine::new(surface, config)?;
    engine.set_sprite_image(ImageSlot::Ready(SHEET_IMAGE));
    if args.debug {
        engine.toggle_debug_mode();
    }

    let runs = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&runs);
    engine.on_game_over(move || counter.set(counter.get() + 1));

    engine.start();
    let mut timestamp = 0.0;
    let mut crouching = false;
    for _ in 0..args.ticks {
        if engine.is_game_over() {
            info!(score = engine.score(), "restarting");
            engine.handle_jump();
        }

        let decision = autopilot::decide(engine.state());
        if decision.crouch != crouching {
            engine.handle_crouch(decision.crouch);
            crouching = decision.crouch;
        }
        if decision.jump {
            engine.handle_jump();
        }
        if decision.shoot {
            engine.handle_shoot();
        }
        if decision.turbo {
            engine.activate_turbo();
        }

        timestamp += NOMINAL_FRAME_MS;
        engine.frame(timestamp)?;
    }

    info!(
        ticks = args.ticks,
        game_overs = runs.get(),
        score = engine.score(),
        high_score = engine.high_score(),
        frames = engine.surface().frames_presented,
        "headless run finished"
    );
    Ok(())
}

// ── Interactive run ───────────────────────────────────────────────────────────

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

const CROUCH_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

fn is_crouch_key(code: &KeyCode) -> bool {
    CROUCH_KEYS.contains(code)
}

fn crouch_held(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> bool {
    CROUCH_KEYS.iter().any(|k| is_held(key_frame, k, frame))
}

/// Make the player's posture follow the crouch keys.  Re-applied every
/// frame, so a key held through a jump crouches on landing and late
/// repeats re-engage a crouch the hold window let go of.
fn sync_crouch<S: Surface>(engine: &mut Engine<S>, held: bool) {
    if held != engine.is_crouching() {
        engine.handle_crouch(held);
    }
}

/// Forward terminal input to the engine until the player quits.
///
/// One-shot actions fire on press.  Crouch is held: it is recomputed from
/// the key map every frame, ends at once on a release event where the
/// terminal reports them, otherwise once the key has been silent for
/// `HOLD_WINDOW` frames.
fn game_loop<W: Write>(
    engine: &mut Engine<TerminalSurface<W>>,
    rx: &mpsc::Receiver<Event>,
    score_path: &Path,
) -> Result<(), EngineError> {
    let game_over = Rc::new(Cell::new(false));
    let flag = Rc::clone(&game_over);
    engine.on_game_over(move || flag.set(true));

    let clock = Instant::now();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                            engine.handle_jump();
                        }
                        KeyCode::Char('f') | KeyCode::Char('F') => engine.handle_shoot(),
                        KeyCode::Char('p') | KeyCode::Char('P') => engine.toggle_pause(),
                        KeyCode::Char('t') | KeyCode::Char('T') => engine.activate_turbo(),
                        KeyCode::Char('g') | KeyCode::Char('G') => engine.toggle_debug_mode(),
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                    if is_crouch_key(&code) {
                        engine.handle_crouch(false);
                    }
                }
            }
        }

        sync_crouch(engine, crouch_held(&key_frame, frame));

        if engine.is_game_started() {
            engine.frame(clock.elapsed().as_secs_f64() * 1000.0)?;
        } else {
            engine.draw_initial_state()?;
        }

        if game_over.replace(false) {
            save_high_score(score_path, engine.high_score());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

fn play<W: Write>(
    out: W,
    args: &Args,
    config: GameConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<(), EngineError> {
    let score_path = high_score_path(args);
    let (cols, rows) = term::size()?;
    let surface = TerminalSurface::new(
        out,
        config.surface.width,
        config.surface.height,
        cols,
        rows,
        &SpriteRegions::default(),
    );
    let mut engine = Engine::new(surface, config)?;
    engine.set_sprite_image(ImageSlot::Ready(SHEET_IMAGE));
    engine.restore_high_score(load_high_score(&score_path));
    if args.debug {
        engine.toggle_debug_mode();
    }

    let outcome = game_loop(&mut engine, rx, &score_path);
    engine.stop();
    save_high_score(&score_path, engine.high_score());
    outcome
}

fn run_interactive(args: &Args, config: GameConfig) -> Result<(), EngineError> {
    let mut out = BufWriter::new(stdout());

    term::enable_raw_mode()?;
    out.execute(term::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release events; terminals without support fall back to
    // the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = play(&mut out, args, config, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(term::LeaveAlternateScreen);
    let _ = term::disable_raw_mode();

    result
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), EngineError> {
    let args = Args::parse();
    init_logging(&args)?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    info!(seed = ?config.seed, headless = args.headless, "dino_runner starting");

    if args.headless {
        run_headless(&args, config)
    } else {
        run_interactive(&args, config)
    }
}
