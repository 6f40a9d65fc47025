#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic terrain generation for Pathscape grids.
//!
//! A grid is classified by sampling Perlin noise at a per-generation offset.
//! The start and end corners are pinned, and a square safety border next to
//! each corner is forced free so that both endpoints always have room to
//! move. Given the same size, noise scale and offset the generator always
//! returns an identical grid; the offset is the only source of variety.

use std::fmt;

use noise::{NoiseFn, Perlin};
use pathscape_core::{CellCoord, Grid, Terrain, MIN_GENERATED_SIZE};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Side length used when callers do not pick one.
pub const DEFAULT_SIZE: u32 = 20;
/// Noise frequency used when callers do not pick one.
pub const DEFAULT_NOISE_SCALE: f64 = 5.0;

const OFFSET_RANGE: f64 = 1_000.0;
const TERRAIN_NOISE_SEED: u32 = 0x7e55_a1d0;

/// Position in noise space where sampling begins for one generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseOffset {
    x: f64,
    y: f64,
}

impl NoiseOffset {
    /// Creates an offset from explicit noise-space coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Derives a reproducible offset from a seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::sample(&mut rng)
    }

    /// Draws a fresh offset from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self::sample(&mut rand::thread_rng())
    }

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let x = rng.gen_range(0.0..OFFSET_RANGE);
        let y = rng.gen_range(0.0..OFFSET_RANGE);
        Self { x, y }
    }

    /// Horizontal noise-space offset.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical noise-space offset.
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.y
    }
}

/// Noise cut-offs that split samples into terrain classes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Samples at or below this value become [`Terrain::Blocked`].
    pub blocked: f64,
    /// Samples at or below this value (and above `blocked`) become [`Terrain::Difficult`].
    pub difficult: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            blocked: 0.3,
            difficult: 0.475,
        }
    }
}

impl Thresholds {
    /// Classifies a normalised noise sample.
    #[must_use]
    pub fn classify(&self, value: f64) -> Terrain {
        if value <= self.blocked {
            Terrain::Blocked
        } else if value <= self.difficult {
            Terrain::Difficult
        } else {
            Terrain::Free
        }
    }
}

/// Builds grids from coherent noise.
#[derive(Clone)]
pub struct GridGenerator {
    thresholds: Thresholds,
    noise: Perlin,
}

impl fmt::Debug for GridGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridGenerator")
            .field("thresholds", &self.thresholds)
            .field("noise_seed", &TERRAIN_NOISE_SEED)
            .finish()
    }
}

impl Default for GridGenerator {
    fn default() -> Self {
        Self::new(Thresholds::default())
    }
}

impl GridGenerator {
    /// Creates a generator using the provided classification thresholds.
    #[must_use]
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            noise: Perlin::new(TERRAIN_NOISE_SEED),
        }
    }

    /// Thresholds applied to noise samples.
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Generates a grid.
    ///
    /// Sizes below [`MIN_GENERATED_SIZE`] are silently raised to it, and a
    /// non-finite noise scale falls back to [`DEFAULT_NOISE_SCALE`].
    #[must_use]
    pub fn generate(&self, size: u32, noise_scale: f64, offset: NoiseOffset) -> Grid {
        let size = clamp_size(size);
        let noise_scale = sanitize_scale(noise_scale);
        let border = safety_border(size);

        let grid = Grid::from_fn(size, |coord| {
            if coord == start_corner() {
                Terrain::Start
            } else if coord == end_corner(size) {
                Terrain::End
            } else if in_safety_zone(coord, size, border) {
                Terrain::Free
            } else {
                self.thresholds
                    .classify(self.sample(coord, size, noise_scale, offset))
            }
        });

        debug!(
            size,
            noise_scale,
            offset_x = offset.x(),
            offset_y = offset.y(),
            blocked = grid.count(Terrain::Blocked),
            difficult = grid.count(Terrain::Difficult),
            "generated terrain grid"
        );
        grid
    }

    /// Normalised noise sample in `[0, 1]` for a cell.
    #[must_use]
    pub fn sample(&self, coord: CellCoord, size: u32, noise_scale: f64, offset: NoiseOffset) -> f64 {
        let side = f64::from(size.max(1));
        let point = [
            f64::from(coord.x()) / side * noise_scale + offset.x(),
            f64::from(coord.y()) / side * noise_scale + offset.y(),
        ];
        ((self.noise.get(point) + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Generates a grid with the default thresholds.
#[must_use]
pub fn generate(size: u32, noise_scale: f64, offset: NoiseOffset) -> Grid {
    GridGenerator::default().generate(size, noise_scale, offset)
}

/// Applies the minimum-size policy.
#[must_use]
pub fn clamp_size(size: u32) -> u32 {
    size.max(MIN_GENERATED_SIZE)
}

/// Width of the forced-free square next to each endpoint, `round(size / 15)`.
#[must_use]
pub fn safety_border(size: u32) -> u32 {
    (f64::from(size) / 15.0).round() as u32
}

/// Whether a cell lies inside the safety square of either endpoint.
#[must_use]
pub fn in_safety_zone(coord: CellCoord, size: u32, border: u32) -> bool {
    let near_start = coord.x() <= border && coord.y() <= border;
    let far_edge = size.saturating_sub(1 + border);
    let near_end = coord.x() >= far_edge && coord.y() >= far_edge;
    near_start || near_end
}

/// Fixed location of the start cell.
#[must_use]
pub const fn start_corner() -> CellCoord {
    CellCoord::new(0, 0)
}

/// Fixed location of the end cell for a grid of the given size.
#[must_use]
pub const fn end_corner(size: u32) -> CellCoord {
    let last = size.saturating_sub(1);
    CellCoord::new(last, last)
}

fn sanitize_scale(noise_scale: f64) -> f64 {
    if noise_scale.is_finite() {
        noise_scale
    } else {
        DEFAULT_NOISE_SCALE
    }
}
