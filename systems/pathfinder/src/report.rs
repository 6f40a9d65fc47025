//! Read-only snapshots handed to presentation collaborators after each step.

use pathscape_core::{CellCoord, Metric, SearchStatus};
use serde::Serialize;

/// Snapshot of a run, safe to hold while the engine keeps stepping.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchReport {
    /// Current lifecycle state.
    pub status: SearchStatus,
    /// Best-known path from the start to the most recently selected node.
    pub path: Vec<CellCoord>,
    /// Accumulated cost of `path`, if a node has been selected.
    pub path_cost: Option<f64>,
    /// Number of nodes selected from the open set so far.
    pub steps: usize,
    /// Size of the open set.
    pub open: usize,
    /// Size of the closed set.
    pub closed: usize,
    /// Metric the run was started with.
    pub metric: Metric,
    /// Whether heuristic tie-breaking is enabled.
    pub tie_break: bool,
}

impl SearchReport {
    /// Whether the report describes a finished route to the goal.
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// One-line summary for status displays.
    #[must_use]
    pub fn summary(&self) -> String {
        let cost = self
            .path_cost
            .map_or_else(|| "-".to_owned(), |cost| format!("{cost:.3}"));
        format!(
            "status: {} | steps: {} | path: {} cells | cost: {} | open: {} | closed: {}",
            self.status,
            self.steps,
            self.path.len(),
            cost,
            self.open,
            self.closed
        )
    }
}
