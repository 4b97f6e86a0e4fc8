#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Lava Runner experience.

mod level_pack;
mod session;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use lava_runner_core::{InputState, LevelStatus};
use lava_runner_rendering::{palette, Presentation, RenderingBackend, Viewport, DEFAULT_SCALE};
use lava_runner_rendering_macroquad::MacroquadBackend;
use lava_runner_world::query;
use log::error;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{level_pack::LevelPack, session::Session};

const WINDOW_WIDTH: f32 = 600.0;
const WINDOW_HEIGHT: f32 = 450.0;
const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(name = "lava-runner")]
#[command(about = "Collect every coin and stay out of the lava")]
struct Cli {
    /// TOML level pack to play instead of the bundled one
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,
    /// Retries granted before the run restarts from the first level
    #[arg(long, default_value_t = 3)]
    lives: u32,
    /// Seed for coin wobble phases; entropy when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Simulate this many seconds with idle input instead of opening a window
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f32>,
    /// Swap interval requested from the platform (0 disables vsync)
    #[arg(long)]
    swap_interval: Option<i32>,
    /// Print frames-per-second once per second
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Lava Runner command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let pack = match &cli.levels {
        Some(path) => LevelPack::load(path)?,
        None => LevelPack::bundled()?,
    };
    let rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let session = Session::new(pack, cli.lives, rng)?;

    match cli.headless {
        Some(seconds) => run_headless(session, seconds),
        None => run_windowed(session, &cli),
    }
}

fn run_windowed(mut session: Session, cli: &Cli) -> Result<()> {
    let viewport = Viewport::new(WINDOW_WIDTH, WINDOW_HEIGHT, DEFAULT_SCALE)?;
    let presentation = Presentation::new("Lava Runner", palette::SKY, session.scene(viewport));
    let backend = MacroquadBackend::new()
        .with_swap_interval(cli.swap_interval)
        .with_show_fps(cli.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        if input.pause_toggle {
            session.toggle_pause();
        }
        if let Err(error) = session.frame(dt, input.input_state()) {
            error!("{error:#}");
        }
        session.refresh_scene(scene);
    })
}

fn run_headless(mut session: Session, seconds: f32) -> Result<()> {
    let frames = (seconds.max(0.0) / HEADLESS_FRAME.as_secs_f32()).ceil() as u64;
    for _ in 0..frames {
        if let Some(progress) = session.frame(HEADLESS_FRAME, InputState::IDLE)? {
            println!("{progress:?}");
        }
        if session.is_complete() {
            break;
        }
    }

    let outcome = match query::status(session.level()) {
        None => "playing",
        Some(LevelStatus::Won) => "won",
        Some(LevelStatus::Lost) => "lost",
    };
    println!(
        "level {} ({}): {outcome}, {} coins left, {} lives left",
        session.level_index() + 1,
        session.level_name(),
        query::coins_remaining(session.level()),
        session.lives()
    );
    Ok(())
}
