use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Metric, SearchConfigError};

/// Lifecycle of a pathfinder run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Initialised and waiting for a run to start.
    #[default]
    Idle,
    /// Stepping towards the goal.
    Running,
    /// The goal was selected from the open set.
    Found,
    /// The open set drained without reaching the goal.
    NotFound,
    /// A user-requested stop; the last partial path remains valid.
    Cancelled,
}

impl SearchStatus {
    /// Whether the run has ended, successfully or not.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Found | Self::NotFound | Self::Cancelled)
    }

    /// Human-readable label for status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Found => "found",
            Self::NotFound => "not found",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable configuration captured when a run starts.
///
/// Nothing in here is read again from the outside world while the run is in
/// flight, so identical configurations replay identical expansions.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Distance function for edge costs and the heuristic.
    pub metric: Metric,
    /// Prefer the smaller heuristic among equal-`f` candidates.
    pub tie_break: bool,
    /// Additive penalty paid when entering a difficult cell.
    pub difficulty_multiplier: f64,
    /// Pause a pacing driver inserts between steps.
    pub step_delay: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            tie_break: false,
            difficulty_multiplier: 1.0,
            step_delay: Duration::ZERO,
        }
    }
}

impl SearchConfig {
    /// Replaces the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Enables or disables heuristic tie-breaking.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: bool) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Replaces the difficult-terrain penalty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty_multiplier: f64) -> Self {
        self.difficulty_multiplier = difficulty_multiplier;
        self
    }

    /// Replaces the pacing delay.
    #[must_use]
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Replaces the pacing delay from a raw number of seconds.
    pub fn with_step_delay_secs(self, seconds: f64) -> Result<Self, SearchConfigError> {
        let delay = Duration::try_from_secs_f64(seconds)
            .map_err(|_| SearchConfigError::InvalidStepDelay(seconds))?;
        Ok(self.with_step_delay(delay))
    }

    /// Whether the difficulty penalty is usable as an edge cost.
    #[must_use]
    pub fn has_valid_difficulty(&self) -> bool {
        self.difficulty_multiplier.is_finite() && self.difficulty_multiplier >= 0.0
    }
}
