use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod driver;
mod error;
mod input;
mod math;
mod render;
mod rotation;
mod terminal_setup;
mod torus;

use config::DonutConfig;
use error::AppResult;
use render::frame::{run_app_loop, run_plain_loop};
use render::AppState;
use terminal_setup::{cleanup_terminal, detect_truecolor, install_panic_hook, setup_terminal};

#[derive(Debug, Parser)]
#[command(name = "asciidonut", version, about = "Rotating ASCII donut for the terminal")]
struct Cli {
    #[arg(long, default_value_t = render::REFERENCE_WIDTH, help = "Canvas width in columns")]
    width: usize,
    #[arg(long, default_value_t = render::REFERENCE_HEIGHT, help = "Canvas height in rows")]
    height: usize,
    #[arg(long, value_name = "MS", default_value_t = 50, help = "Milliseconds between frames")]
    interval_ms: u64,
    #[arg(long, default_value_t = rotation::DELTA_A, allow_negative_numbers = true, help = "Per-frame increment of angle A")]
    delta_a: f32,
    #[arg(long, default_value_t = rotation::DELTA_B, allow_negative_numbers = true, help = "Per-frame increment of angle B")]
    delta_b: f32,
    #[arg(long, default_value = "531", help = "Glyph palette: 531, classic, blocks")]
    glyphs: String,
    #[arg(long, default_value = "white", help = "Color palette: white, ember, ice, neon")]
    colors: String,
    #[arg(long, help = "Pick a random palette color per glyph")]
    random_colors: bool,
    #[arg(long, requires = "random_colors", help = "Seed for random colors")]
    seed: Option<u64>,
    #[arg(long, help = "Draw glyphs without color")]
    no_color: bool,
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..), help = "Stop after N frames")]
    frames: Option<u64>,
    #[arg(long, help = "Write frames as plain text instead of animating in place")]
    plain: bool,
    #[arg(long, value_name = "PATH", help = "Write logs to this file")]
    log_file: Option<PathBuf>,
}

impl From<&Cli> for DonutConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            interval: Duration::from_millis(cli.interval_ms),
            delta_a: cli.delta_a,
            delta_b: cli.delta_b,
            glyphs: cli.glyphs.clone(),
            colors: cli.colors.clone(),
            random_colors: cli.random_colors,
            seed: cli.seed,
        }
    }
}

fn init_logging(cli: &Cli) -> AppResult<()> {
    if let Some(path) = cli.log_file.as_ref() {
        let file = File::create(path)?;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.plain {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }
    // Interactive mode without a log file stays silent; stderr would tear
    // through the alternate screen.
    Ok(())
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut driver = DonutConfig::from(&cli).build_driver()?;

    if cli.plain {
        let mut stdout = BufWriter::new(io::stdout().lock());
        return run_plain_loop(&mut driver, cli.frames, &mut stdout);
    }

    install_panic_hook();
    let mut app_state = AppState::new(driver);
    app_state.use_color = !cli.no_color;
    app_state.use_truecolor = detect_truecolor();
    app_state.max_frames = cli.frames;

    let mut stdout = BufWriter::with_capacity(64 * 1024, io::stdout());
    setup_terminal(&mut stdout)?;
    let run_result = input::thread::spawn_input_thread()
        .map_err(Into::into)
        .and_then(|input_rx| run_app_loop(&mut app_state, &input_rx, &mut stdout));
    let cleanup_result = cleanup_terminal(&mut stdout);

    run_result?;
    cleanup_result
}
