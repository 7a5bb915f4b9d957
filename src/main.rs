mod game;
mod term;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use snake::config::{self, GameConfig, SQUARE_WIDTH};
use snake::GameState;

#[derive(Parser, Debug)]
#[command(name = "snake", about = "Classic snake in the terminal")]
struct Args {
    /// Board width in cells [default: fit the terminal]
    #[arg(long)]
    width: Option<i32>,

    /// Board height in cells [default: fit the terminal]
    #[arg(long)]
    height: Option<i32>,

    #[arg(long, default_value_t = config::DEFAULT_START_LENGTH)]
    start_length: usize,

    /// Starting tick interval in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_START_INTERVAL_MS)]
    interval: u64,

    /// Fastest tick interval in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_SPEED_FLOOR_MS)]
    speed_floor: u64,

    /// Milliseconds taken off the interval per point of score
    #[arg(long, default_value_t = config::DEFAULT_SPEED_STEP_MS)]
    speed_step: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default snake=debug)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let term = term::TermManager::new().context("reading terminal size")?;
    let (term_w, term_h) = term.get_terminal_size();

    // Border on every side, plus a status line underneath
    let max_w = (term_w.saturating_sub(2) / SQUARE_WIDTH) as i32;
    let max_h = term_h.saturating_sub(3) as i32;

    let width = args.width.unwrap_or(max_w);
    let height = args.height.unwrap_or(max_h);
    if width > max_w || height > max_h {
        bail!("a {}x{} board does not fit this terminal (at most {}x{})", width, height, max_w, max_h);
    }

    let config = GameConfig::new(width, height, args.start_length, args.interval, args.speed_floor)
        .context("invalid game settings")?
        .speed_step(args.speed_step);

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut game = game::SnakeGame::new(term, GameState::new(config, rng));
    game.run().context("terminal error")
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "snake=debug".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
