//! Tetristui: falling-block puzzle game with hold and ghost piece in the terminal.

mod app;
mod board;
mod clock;
mod game;
mod ghost;
mod input;
mod piece;
mod shape;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Narrowest board that still fits the I piece lying flat.
const MIN_WIDTH: usize = 4;
/// Shortest board that still fits the I piece standing up.
const MIN_HEIGHT: usize = 4;
/// Largest board we lay out; wider or taller would not fit any terminal.
const MAX_WIDTH: usize = 64;
const MAX_HEIGHT: usize = 64;
/// Frame-rate bounds; below 1 the loop would barely poll input.
const MIN_FRAME_RATE: f64 = 1.0;
const MAX_FRAME_RATE: f64 = 1000.0;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub fall_speed_ms: u64,
    pub frame_rate: f64,
    pub seed: Option<u64>,
    pub no_animation: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: board::DEFAULT_WIDTH,
            height: board::DEFAULT_HEIGHT,
            fall_speed_ms: game::DEFAULT_FALL_SPEED_MS,
            frame_rate: clock::DEFAULT_FRAME_RATE,
            seed: None,
            no_animation: false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board width must be between {min} and {max}, got {0}", min = MIN_WIDTH, max = MAX_WIDTH)]
    WidthOutOfRange(usize),
    #[error("board height must be between {min} and {max}, got {0}", min = MIN_HEIGHT, max = MAX_HEIGHT)]
    HeightOutOfRange(usize),
    #[error("fall speed must be greater than 0 ms")]
    ZeroFallSpeed,
    #[error("frame rate must be between {min} and {max}, got {0}", min = MIN_FRAME_RATE, max = MAX_FRAME_RATE)]
    InvalidFrameRate(f64),
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let width = usize::from(args.width);
        let height = usize::from(args.height);
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&width) {
            return Err(ConfigError::WidthOutOfRange(width));
        }
        if !(MIN_HEIGHT..=MAX_HEIGHT).contains(&height) {
            return Err(ConfigError::HeightOutOfRange(height));
        }
        if args.fall_speed_ms == 0 {
            return Err(ConfigError::ZeroFallSpeed);
        }
        if !(MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&args.fps) {
            return Err(ConfigError::InvalidFrameRate(args.fps));
        }
        Ok(Self {
            width,
            height,
            fall_speed_ms: args.fall_speed_ms,
            frame_rate: args.fps,
            seed: args.seed,
            no_animation: args.no_animation,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = GameConfig::from_args(&args).context("invalid options")?;
    init_logging(args.log_file.as_deref());
    tracing::info!(?config, "starting");

    let theme = match theme::Theme::load(args.theme.as_deref()) {
        Ok(theme) => theme,
        Err(e) => {
            tracing::warn!(error = %e, "theme not loaded, using classic colours");
            theme::Theme::default()
        }
    };

    // Put the terminal back before the panic message is printed.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = app::restore_terminal();
        original_hook(panic_info);
    }));

    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

/// Log to a file; stdout/stderr would corrupt the terminal UI.
fn init_logging(path: Option<&Path>) {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("tetristui.log"));

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = match std::fs::File::create(&path) {
        Ok(f) => f,
        Err(_) => match std::fs::File::create(null_device) {
            Ok(f) => f,
            Err(_) => return,
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

/// Falling-block puzzle game in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tetristui",
    version,
    about = "Falling-block puzzle in the terminal with hold and ghost piece.",
    long_about = "Tetristui is a terminal falling-block puzzle.\n\n\
        Move and rotate falling tetrominoes; full rows clear for 100 points each. \
        The grey outline shows where the piece will land.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move      Up or k     Rotate    Down or j  Soft drop\n  \
        Space              Hard drop C           Hold      P          Pause\n  \
        Q / Esc            Quit      R           Restart (after game over)"
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Gravity interval: the piece falls one row every MS milliseconds.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub fall_speed_ms: u64,

    /// Frame-rate cap for the game loop.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub fps: f64,

    /// Seed for the piece generator (same seed, same piece sequence).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses the classic colours if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Disable the game-over fade.
    #[arg(long)]
    pub no_animation: bool,

    /// Log file (default: tetristui.log in the system temp directory). Filter with RUST_LOG.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
