#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pathscape workspace.
//!
//! This crate defines the immutable grid model produced by the terrain
//! generator, the distance metrics understood by the search engine, and the
//! configuration and status values exchanged between the engine and its
//! collaborators. Generators build a [`Grid`] wholesale, the pathfinder reads
//! it without mutation, and adapters consume [`SearchStatus`] values together
//! with cell coordinates to present the evolving search.

mod error;
mod grid;
mod metric;
mod search;

pub use error::{ConfigError, GridError, MetricParseError, SearchConfigError, StartError};
pub use grid::{Cell, CellCoord, Endpoints, Grid, Terrain};
pub use metric::Metric;
pub use search::{SearchConfig, SearchStatus};

/// Smallest side length the terrain generator will produce.
pub const MIN_GENERATED_SIZE: u32 = 10;
