#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a Pathscape grid and searches it.

mod config;
mod frame;

use std::{
    io::{self, Write},
    ops::ControlFlow,
    path::PathBuf,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use pathscape_core::{Metric, Terrain};
use pathscape_system_pacing::{drive, ThreadSleep};
use pathscape_system_pathfinder::{Pathfinder, SearchReport};
use pathscape_terrain::{generate, NoiseOffset};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::config::{FileConfig, RunSettings};

/// Command-line arguments for the Pathscape experience.
#[derive(Debug, Parser)]
#[command(name = "pathscape")]
#[command(about = "Generate a noise terrain grid and watch A* cross it")]
struct Args {
    /// Optional TOML file providing defaults for every other option
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid side length in cells (values below 10 are raised to 10)
    #[arg(long)]
    size: Option<u32>,

    /// Noise frequency across the grid; larger values give busier terrain
    #[arg(long)]
    noise_scale: Option<f64>,

    /// Seed for the noise offset; omitted means a fresh random grid
    #[arg(long)]
    seed: Option<u64>,

    /// Distance metric: euclidean, chebyshev or manhattan
    #[arg(long)]
    metric: Option<Metric>,

    /// Prefer candidates closer to the goal when costs tie
    #[arg(long)]
    tie_break: bool,

    /// Extra cost paid for entering a difficult cell
    #[arg(long)]
    difficulty: Option<f64>,

    /// Steps per half second; higher is faster
    #[arg(long, conflicts_with = "instant")]
    speed: Option<f64>,

    /// Run without pausing between steps
    #[arg(long)]
    instant: bool,

    /// Print the grid after every step
    #[arg(long)]
    frames: bool,

    /// Cancel the search once this many nodes have been expanded
    #[arg(long)]
    cancel_after: Option<usize>,

    /// Print the final report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log filter directive, e.g. `debug` or `pathscape_system_pathfinder=trace`
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    size: u32,
    seed: Option<u64>,
    fingerprint: String,
    grid: String,
    report: &'a SearchReport,
}

/// Entry point for the Pathscape command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = RunSettings::resolve(file, &args)?;

    let stdout = io::stdout();
    run(&settings, &mut stdout.lock())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn run(settings: &RunSettings, out: &mut impl Write) -> Result<()> {
    let offset = settings
        .seed
        .map_or_else(NoiseOffset::random, NoiseOffset::from_seed);
    let grid = generate(settings.size, settings.noise_scale, offset);
    info!(
        size = grid.size(),
        seed = ?settings.seed,
        blocked = grid.count(Terrain::Blocked),
        "grid generated"
    );

    let mut pathfinder = Pathfinder::new();
    pathfinder
        .initialise(grid.clone())
        .context("generated grid is not searchable")?;
    pathfinder
        .start(settings.search.clone())
        .context("failed to start search")?;

    let mut write_error = None;
    let _ = drive(&mut pathfinder, &mut ThreadSleep, |engine| {
        if settings.frames {
            let printed = writeln!(
                out,
                "{}\n{}\n",
                frame::render(&grid, engine),
                engine.report().summary()
            );
            if let Err(err) = printed {
                write_error = Some(err);
                return ControlFlow::Break(());
            }
        }
        match settings.cancel_after {
            Some(limit) if engine.steps() >= limit => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });
    if let Some(err) = write_error {
        return Err(err).context("failed to write frame");
    }

    let report = pathfinder.report();
    if settings.json {
        let output = RunOutput {
            size: grid.size(),
            seed: settings.seed,
            fingerprint: frame::hex(&grid.fingerprint()),
            grid: frame::render(&grid, &pathfinder),
            report: &report,
        };
        serde_json::to_writer_pretty(&mut *out, &output).context("failed to encode report")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", frame::render(&grid, &pathfinder))?;
        writeln!(out, "{}", report.summary())?;
        writeln!(out, "fingerprint: {}", frame::hex(&grid.fingerprint()))?;
    }
    Ok(())
}
