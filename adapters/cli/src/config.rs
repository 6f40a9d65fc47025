//! Run settings assembled from an optional TOML file and command-line flags.

use std::{fs, path::Path};

use anyhow::{ensure, Context, Result};
use pathscape_core::{Metric, SearchConfig};
use pathscape_system_pacing::speed_to_delay;
use pathscape_terrain::{DEFAULT_NOISE_SCALE, DEFAULT_SIZE};
use serde::Deserialize;

use crate::Args;

/// Contents of a `pathscape.toml` file. Every field is optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    grid: GridSection,
    search: SearchSection,
    output: OutputSection,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct GridSection {
    size: Option<u32>,
    noise_scale: Option<f64>,
    seed: Option<u64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct SearchSection {
    metric: Option<Metric>,
    tie_break: Option<bool>,
    difficulty: Option<f64>,
    speed: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct OutputSection {
    frames: Option<bool>,
    json: Option<bool>,
}

impl FileConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Fully resolved settings for one invocation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RunSettings {
    pub(crate) size: u32,
    pub(crate) noise_scale: f64,
    pub(crate) seed: Option<u64>,
    pub(crate) search: SearchConfig,
    pub(crate) frames: bool,
    pub(crate) json: bool,
    pub(crate) cancel_after: Option<usize>,
}

impl RunSettings {
    /// Layers command-line flags over the file, falling back to defaults.
    pub(crate) fn resolve(file: FileConfig, args: &Args) -> Result<Self> {
        let FileConfig {
            grid,
            search,
            output,
        } = file;

        let difficulty = args.difficulty.or(search.difficulty).unwrap_or(1.0);
        ensure!(
            difficulty.is_finite() && difficulty >= 0.0,
            "difficulty must be finite and non-negative (received {difficulty})"
        );

        let mut config = SearchConfig::default()
            .with_metric(args.metric.or(search.metric).unwrap_or_default())
            .with_tie_break(args.tie_break || search.tie_break.unwrap_or(false))
            .with_difficulty(difficulty);
        if !args.instant {
            if let Some(speed) = args.speed.or(search.speed) {
                config = config.with_step_delay(speed_to_delay(speed)?);
            }
        }

        Ok(Self {
            size: args.size.or(grid.size).unwrap_or(DEFAULT_SIZE),
            noise_scale: args
                .noise_scale
                .or(grid.noise_scale)
                .unwrap_or(DEFAULT_NOISE_SCALE),
            seed: args.seed.or(grid.seed),
            search: config,
            frames: args.frames || output.frames.unwrap_or(false),
            json: args.json || output.json.unwrap_or(false),
            cancel_after: args.cancel_after,
        })
    }
}
