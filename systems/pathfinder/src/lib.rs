#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Incremental A* search over Pathscape grids.
//!
//! The engine is an explicit state machine. [`Pathfinder::start`] seeds a run
//! and every call to [`Pathfinder::step`] selects exactly one node from the
//! open set, so callers decide how quickly the search unfolds and may inspect
//! the partial result between steps. Nothing in here sleeps or spawns
//! threads; pacing belongs to whoever drives the steps.

mod open_set;
mod overlay;
mod report;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use pathscape_core::{
    CellCoord, ConfigError, Grid, SearchConfig, SearchStatus, StartError, Terrain,
};
use tracing::{debug, info, warn};

use self::{
    open_set::OpenSet,
    overlay::{Membership, SearchOverlay},
};

pub use report::SearchReport;

/// Cloneable cancellation request observed at the next step boundary.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    requested: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests that the current run stops before its next step.
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// Whether a cancellation is pending.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

#[derive(Clone, Debug)]
struct PreparedGrid {
    grid: Arc<Grid>,
    start: usize,
    end: usize,
}

/// Step-driven A* engine owning all mutable search state for one grid.
#[derive(Debug, Default)]
pub struct Pathfinder {
    prepared: Option<PreparedGrid>,
    overlay: SearchOverlay,
    open: OpenSet,
    status: SearchStatus,
    config: SearchConfig,
    current_node: Option<usize>,
    current_path: Vec<CellCoord>,
    expansions: Vec<CellCoord>,
    cancel: CancelHandle,
}

impl Pathfinder {
    /// Creates an engine with no grid attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a grid and rebuilds the search overlay for it.
    ///
    /// On error nothing changes, including any previous grid and results.
    pub fn initialise(&mut self, grid: impl Into<Arc<Grid>>) -> Result<(), ConfigError> {
        if self.status == SearchStatus::Running {
            warn!("rejected initialise while a search is running");
            return Err(ConfigError::SearchInProgress);
        }

        let grid = grid.into();
        let endpoints = grid.endpoints()?;
        let (Some(start), Some(end)) = (grid.index_of(endpoints.start), grid.index_of(endpoints.end))
        else {
            return Err(ConfigError::NoStart);
        };

        info!(
            size = grid.size(),
            start = %endpoints.start,
            end = %endpoints.end,
            "pathfinder initialised"
        );
        self.prepared = Some(PreparedGrid { grid, start, end });
        self.reset_run();
        self.status = SearchStatus::Idle;
        Ok(())
    }

    /// Begins a run with the provided configuration.
    ///
    /// A call while a run is in flight is rejected without touching the
    /// current run. Starting from a terminal state discards the previous
    /// results and rebuilds the overlay first.
    pub fn start(&mut self, config: SearchConfig) -> Result<(), StartError> {
        if self.status == SearchStatus::Running {
            warn!("rejected start while a search is already running");
            return Err(StartError::AlreadyRunning);
        }
        if !config.has_valid_difficulty() {
            return Err(StartError::InvalidDifficulty(config.difficulty_multiplier));
        }
        let Some(prepared) = self.prepared.clone() else {
            return Err(StartError::NotInitialised);
        };

        self.reset_run();
        let Some(start_coord) = prepared.grid.coord_of(prepared.start) else {
            return Err(StartError::NotInitialised);
        };
        let Some(end_coord) = prepared.grid.coord_of(prepared.end) else {
            return Err(StartError::NotInitialised);
        };

        let h = config.metric.distance(start_coord, end_coord);
        if let Some(node) = self.overlay.node_mut(prepared.start) {
            node.relax(0.0, h, None);
        }
        let _ = self.open.push(&mut self.overlay, prepared.start);

        info!(
            metric = %config.metric,
            tie_break = config.tie_break,
            difficulty = config.difficulty_multiplier,
            step_delay_ms = config.step_delay.as_millis() as u64,
            "search started"
        );
        self.config = config;
        self.status = SearchStatus::Running;
        Ok(())
    }

    /// Advances the run by selecting and expanding one node.
    ///
    /// Does nothing unless the engine is running. Returns the status after
    /// the step.
    pub fn step(&mut self) -> SearchStatus {
        if self.status != SearchStatus::Running {
            return self.status;
        }
        if self.cancel.is_requested() {
            self.finish_cancelled();
            return self.status;
        }
        let Some(prepared) = self.prepared.as_ref() else {
            return self.status;
        };
        let grid = prepared.grid.as_ref();

        let Some(best) = self.open.pop_best(&self.overlay, self.config.tie_break) else {
            self.status = SearchStatus::NotFound;
            info!(
                steps = self.expansions.len(),
                closed = self.overlay.indices_with(Membership::Closed).count(),
                "search exhausted without reaching the goal"
            );
            return self.status;
        };
        let Some(coord) = grid.coord_of(best) else {
            self.status = SearchStatus::NotFound;
            return self.status;
        };

        self.overlay.close(best);
        self.expansions.push(coord);
        self.current_node = Some(best);
        self.current_path = self.overlay.construct_path(grid, best);

        if best == prepared.end {
            self.status = SearchStatus::Found;
            info!(
                steps = self.expansions.len(),
                path_len = self.current_path.len(),
                cost = self.current_cost().unwrap_or(f64::NAN),
                "search reached the goal"
            );
            return self.status;
        }

        let Some(end_coord) = grid.coord_of(prepared.end) else {
            return self.status;
        };
        expand(
            grid,
            &mut self.overlay,
            &mut self.open,
            &self.config,
            best,
            end_coord,
        );

        debug!(
            step = self.expansions.len(),
            x = coord.x(),
            y = coord.y(),
            g = self.current_cost().unwrap_or(f64::NAN),
            open = self.open.len(),
            "expanded node"
        );
        self.status
    }

    /// Steps until the run leaves the running state.
    pub fn run_to_completion(&mut self) -> SearchStatus {
        while self.step() == SearchStatus::Running {}
        self.status
    }

    /// Stops the current run, keeping the last partial path for inspection.
    ///
    /// Steps never overlap with this call, so the stop is immediate. Returns
    /// `false` when no run was in flight.
    pub fn cancel(&mut self) -> bool {
        if self.status != SearchStatus::Running {
            return false;
        }

        self.finish_cancelled();
        true
    }

    /// Handle that can request cancellation from elsewhere, observed at the
    /// next step boundary.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Configuration of the current or most recent run.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Grid attached by the last successful [`Pathfinder::initialise`].
    #[must_use]
    pub fn grid(&self) -> Option<&Arc<Grid>> {
        self.prepared.as_ref().map(|prepared| &prepared.grid)
    }

    /// Best-known path from the start to the last selected node.
    ///
    /// Empty until the first step; the full route once the goal is found.
    #[must_use]
    pub fn current_path(&self) -> &[CellCoord] {
        &self.current_path
    }

    /// Accumulated cost of [`Pathfinder::current_path`].
    #[must_use]
    pub fn current_cost(&self) -> Option<f64> {
        let node = self.overlay.node(self.current_node?)?;
        Some(node.g)
    }

    /// Total cost of the found route, once the goal has been reached.
    #[must_use]
    pub fn path_cost(&self) -> Option<f64> {
        if self.status != SearchStatus::Found {
            return None;
        }
        self.current_cost()
    }

    /// Best known cost from the start to the cell, if it has been reached.
    #[must_use]
    pub fn node_cost(&self, coord: CellCoord) -> Option<f64> {
        let index = self.prepared.as_ref()?.grid.index_of(coord)?;
        let g = self.overlay.node(index)?.g;
        g.is_finite().then_some(g)
    }

    /// Number of nodes selected so far in this run.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.expansions.len()
    }

    /// Cells in the order they were selected from the open set.
    #[must_use]
    pub fn expansion_order(&self) -> &[CellCoord] {
        &self.expansions
    }

    /// Cells currently in the open set, row by row.
    #[must_use]
    pub fn open_cells(&self) -> Vec<CellCoord> {
        self.cells_with(Membership::Open)
    }

    /// Cells currently in the closed set, row by row.
    #[must_use]
    pub fn closed_cells(&self) -> Vec<CellCoord> {
        self.cells_with(Membership::Closed)
    }

    /// Route from the start to `coord` following recorded predecessors.
    ///
    /// Empty when the cell is outside the grid or has not been reached in the
    /// current run.
    #[must_use]
    pub fn construct_path(&self, coord: CellCoord) -> Vec<CellCoord> {
        let Some(prepared) = self.prepared.as_ref() else {
            return Vec::new();
        };
        let Some(index) = prepared.grid.index_of(coord) else {
            return Vec::new();
        };
        let reached = self
            .overlay
            .node(index)
            .is_some_and(|node| node.g.is_finite());
        if !reached {
            return Vec::new();
        }

        self.overlay.construct_path(&prepared.grid, index)
    }

    /// Snapshot of the run for presentation collaborators.
    #[must_use]
    pub fn report(&self) -> SearchReport {
        SearchReport {
            status: self.status,
            path: self.current_path.clone(),
            path_cost: self.current_cost(),
            steps: self.expansions.len(),
            open: self.open.len(),
            closed: self.overlay.indices_with(Membership::Closed).count(),
            metric: self.config.metric,
            tie_break: self.config.tie_break,
        }
    }

    fn reset_run(&mut self) {
        let len = self
            .prepared
            .as_ref()
            .map_or(0, |prepared| prepared.grid.len());
        self.overlay = SearchOverlay::new(len);
        self.open.clear();
        self.current_node = None;
        self.current_path.clear();
        self.expansions.clear();
        self.cancel.clear();
    }

    fn finish_cancelled(&mut self) {
        self.status = SearchStatus::Cancelled;
        info!(
            steps = self.expansions.len(),
            path_len = self.current_path.len(),
            "search cancelled"
        );
    }

    fn cells_with(&self, membership: Membership) -> Vec<CellCoord> {
        let Some(prepared) = self.prepared.as_ref() else {
            return Vec::new();
        };
        self.overlay
            .indices_with(membership)
            .filter_map(|index| prepared.grid.coord_of(index))
            .collect()
    }
}

/// Relaxes every walkable Moore neighbour of `best`.
fn expand(
    grid: &Grid,
    overlay: &mut SearchOverlay,
    open: &mut OpenSet,
    config: &SearchConfig,
    best: usize,
    end: CellCoord,
) {
    let (Some(origin), Some(best_g)) = (grid.coord_of(best), overlay.node(best).map(|node| node.g))
    else {
        return;
    };

    for neighbor in grid.neighbors(origin) {
        let (Some(terrain), Some(index)) = (grid.terrain(neighbor), grid.index_of(neighbor)) else {
            continue;
        };
        if !terrain.is_walkable() {
            continue;
        }

        let mut tentative = best_g + config.metric.distance(origin, neighbor);
        if terrain == Terrain::Difficult {
            tentative += config.difficulty_multiplier;
        }

        let Some(node) = overlay.node_mut(index) else {
            continue;
        };
        if tentative >= node.g {
            continue;
        }

        let h = config.metric.distance(neighbor, end);
        node.relax(tentative, h, Some(best));
        let _ = open.push(overlay, index);
    }
}
