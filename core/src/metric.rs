use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CellCoord, MetricParseError};

/// Distance function used for both edge cost and the heuristic to the goal.
///
/// The metric is chosen when a run starts and stays fixed until it ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Straight-line distance; diagonal steps cost `√2`.
    #[default]
    Euclidean,
    /// `max(|dx|, |dy|)`; diagonal and orthogonal steps cost the same.
    Chebyshev,
    /// `|dx| + |dy|`. Kept for compatibility: a diagonal step costs 2, so
    /// the heuristic overestimates under 8-connected movement and found paths
    /// are not guaranteed to be optimal.
    Manhattan,
}

impl Metric {
    /// Every supported metric in presentation order.
    pub const ALL: [Metric; 3] = [Metric::Euclidean, Metric::Chebyshev, Metric::Manhattan];

    /// Distance between two cells under this metric.
    #[must_use]
    pub fn distance(self, from: CellCoord, to: CellCoord) -> f64 {
        let (dx, dy) = from.deltas(to);
        let (dx, dy) = (f64::from(dx), f64::from(dy));
        match self {
            Self::Euclidean => dx.hypot(dy),
            Self::Chebyshev => dx.max(dy),
            Self::Manhattan => dx + dy,
        }
    }

    /// Whether the heuristic never overestimates under 8-connected movement.
    #[must_use]
    pub const fn is_diagonal_admissible(self) -> bool {
        !matches!(self, Self::Manhattan)
    }

    /// Lower-case name accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Chebyshev => "chebyshev",
            Self::Manhattan => "manhattan",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MetricParseError(wanted.to_owned()))
    }
}
