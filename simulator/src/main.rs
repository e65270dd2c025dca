//! LED Matrix Weather Dashboard Simulator.
//!
//! Runs the rendering core from `matrix-common` on the desktop, either
//! headless (optionally writing a PNG snapshot of the last frame) or in an
//! SDL window when built with the `window` feature.
//!
//! # Usage
//!
//! ```bash
//! # Weather dashboard (needs WEATHERAPI_KEY or api_key in the config file)
//! simulator dashboard Oslo --duration 30 --snapshot oslo.png
//!
//! # Animation demos
//! simulator spinner
//! simulator radial --duration 9
//! simulator scroll "hello world" --font-height 10 --duration 10
//! simulator play nyan.gif
//!
//! # Interactive window
//! cargo run -p matrix-simulator --features window -- --window radial
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod config;
mod dashboard;
mod decode;
mod panel;
mod timing;
mod weather;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use embedded_graphics::prelude::Size;
use log::{LevelFilter, info, warn};
use matrix_common::animations::{AnimationPhase, ScrollingText, SequencePlayback};
use matrix_common::config::{PANEL_FONT_HEIGHT, SPINNER_FONT_HEIGHT};
use matrix_common::{Canvas, FontBook, FramePresenter, Scheduler};

use crate::config::{API_KEY_ENV, DashboardConfig};
use crate::dashboard::{Dashboard, run_dashboard, spawn_weather_worker};
use crate::decode::load_image;
use crate::panel::{HostPanel, SnapshotPanel};
use crate::timing::{StdClock, StopToken, run_until};
use crate::weather::{HttpFetcher, WeatherApi};

/// LED matrix weather dashboard simulator
#[derive(Parser)]
#[command(name = "simulator", version, about = "LED matrix weather dashboard simulator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Stop after this many seconds
    #[arg(short, long, global = true)]
    duration: Option<u64>,

    /// Write the last frame to this PNG file on exit (overrides the config)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Show an SDL window instead of running headless
    #[cfg(feature = "window")]
    #[arg(short, long, global = true)]
    window: bool,
}

#[derive(Subcommand, Clone)]
enum Command {
    /// Loading spinner, then live weather for LOCATION (default)
    Dashboard {
        /// Location query; overrides the config file
        location: Option<String>,
    },

    /// Loading spinner on its own
    Spinner,

    /// Eased radial fill loop
    Radial,

    /// Scrolling text marquee
    Scroll {
        text: String,

        /// Glyph height in pixels
        #[arg(long, default_value_t = 10)]
        font_height: u32,
    },

    /// Play an image or GIF scaled to the matrix
    Play {
        /// Image path, relative to assets_root unless absolute
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(path) = cli.snapshot {
        config.snapshot_path = Some(path);
    }
    config.validate()?;

    let command = cli.command.unwrap_or(Command::Dashboard { location: None });
    let limit = cli.duration.map(Duration::from_secs);
    let stop = StopToken::new();
    let size = Size::new(config.cols, config.rows);

    #[cfg(feature = "window")]
    if cli.window {
        let panel = panel::WindowPanel::new(size, config.scale, "LED Matrix", stop.clone());
        return run(panel, &command, limit, &config, &stop);
    }

    run(SnapshotPanel::new(size, config.scale), &command, limit, &config, &stop)
}

fn run<P: HostPanel>(
    panel: P,
    command: &Command,
    limit: Option<Duration>,
    config: &DashboardConfig,
    stop: &StopToken,
) -> Result<()> {
    let mut presenter = FramePresenter::new(panel).context("creating frame buffers")?;
    let back = presenter.create_canvas().context("back buffer already issued")?;
    let mut clock = StdClock::new();
    let mut fonts = FontBook::new();

    let phase = match command {
        Command::Dashboard { location } => {
            let location = location.clone().unwrap_or_else(|| config.location.clone());
            run_dashboard_command(&mut presenter, &mut clock, back, &mut fonts, location, limit, config, stop)?;
            return finish(&presenter, config);
        }
        Command::Spinner => {
            AnimationPhase::spinner(fonts.font(SPINNER_FONT_HEIGHT)?, limit.unwrap_or(config.loading_duration()))
        }
        Command::Radial => AnimationPhase::radial_fill(limit),
        Command::Scroll { text, font_height } => {
            let font = fonts.font(*font_height)?;
            let y = (config.rows as i32 - font.height() as i32) / 2;
            AnimationPhase::scroll(ScrollingText::new(text.as_str(), font, y))
        }
        Command::Play { path } => {
            let path = config.asset_path(path);
            let image = load_image(&path)?;
            info!("Playing {} ({} frames, {:?} per loop)", path.display(), image.frame_count(), image.total_duration());
            let budget = limit.unwrap_or(image.total_duration() * 3);
            AnimationPhase::sequence(SequencePlayback::fullscreen(image, config.cols, config.rows), budget)
        }
    };

    Scheduler::new(&mut presenter, &mut clock).run_phase(back, &phase, run_until(stop, limit));
    finish(&presenter, config)
}

#[allow(clippy::too_many_arguments)]
fn run_dashboard_command<P: HostPanel>(
    presenter: &mut FramePresenter<P>,
    clock: &mut StdClock,
    back: Canvas,
    fonts: &mut FontBook,
    location: String,
    limit: Option<Duration>,
    config: &DashboardConfig,
    stop: &StopToken,
) -> Result<()> {
    let api_key = config
        .api_key
        .clone()
        .with_context(|| format!("no weather API key: set {API_KEY_ENV} or api_key in the config file"))?;

    let loading = AnimationPhase::spinner(fonts.font(SPINNER_FONT_HEIGHT)?, config.loading_duration());
    let panel_font = fonts.font(PANEL_FONT_HEIGHT)?;

    let (updates, worker) = spawn_weather_worker(
        WeatherApi::new(api_key, config.fetch_timeout()),
        HttpFetcher::new(config.fetch_timeout()),
        location.clone(),
        config.refresh_interval(),
        stop.clone(),
    );

    let mut dashboard = Dashboard::new(panel_font, location, updates);
    run_dashboard(presenter, clock, back, &mut dashboard, loading, config.frame_time(), run_until(stop, limit));
    if dashboard.panel().conditions.is_none() {
        warn!("No weather data was received");
    }

    stop.stop();
    worker.join().map_err(|_| anyhow!("weather worker panicked"))
}

fn finish<P: HostPanel>(
    presenter: &FramePresenter<P>,
    config: &DashboardConfig,
) -> Result<()> {
    info!("{} frames presented", presenter.frames_presented());
    if let Some(path) = &config.snapshot_path {
        presenter.panel().save_snapshot(path)?;
    }
    Ok(())
}
