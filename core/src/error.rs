use thiserror::Error;

/// Errors produced while parsing a grid from its text representation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The text contained no rows.
    #[error("grid text contains no rows")]
    Empty,
    /// A row's length differs from the number of rows.
    #[error("row {row} has {found} cells but the grid is {expected} cells wide")]
    NotSquare {
        /// Zero-based index of the offending row.
        row: usize,
        /// Number of rows, which every row must match.
        expected: usize,
        /// Number of cells found in the row.
        found: usize,
    },
    /// A glyph does not name any terrain.
    #[error("unknown terrain glyph '{glyph}' at ({x}, {y})")]
    UnknownGlyph {
        /// Character that failed to parse.
        glyph: char,
        /// Column of the glyph.
        x: usize,
        /// Row of the glyph.
        y: usize,
    },
}

/// Caller misuse detected while preparing the pathfinder for a run.
///
/// Configuration errors are distinct from search outcomes: a grid that
/// triggers one of these never reaches the search loop.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The grid has no start cell.
    #[error("grid has no start cell")]
    NoStart,
    /// The grid has no end cell.
    #[error("grid has no end cell")]
    NoEnd,
    /// The grid has more than one start cell.
    #[error("grid has {count} start cells, expected exactly one")]
    MultipleStarts {
        /// Number of start cells found.
        count: usize,
    },
    /// The grid has more than one end cell.
    #[error("grid has {count} end cells, expected exactly one")]
    MultipleEnds {
        /// Number of end cells found.
        count: usize,
    },
    /// The engine is mid-run and cannot be re-initialised.
    #[error("cannot initialise while a search is running")]
    SearchInProgress,
}

/// Rejections returned when a search run cannot begin.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum StartError {
    /// A run is already in flight on this engine.
    #[error("a search is already running")]
    AlreadyRunning,
    /// No grid has been initialised.
    #[error("pathfinder has not been initialised with a grid")]
    NotInitialised,
    /// Difficulty penalties must be finite and non-negative.
    #[error("difficulty multiplier must be finite and non-negative (received {0})")]
    InvalidDifficulty(f64),
}

/// Errors produced while building a [`crate::SearchConfig`] from raw values.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum SearchConfigError {
    /// Step delays are expressed in non-negative, finite seconds.
    #[error("step delay must be finite and non-negative (received {0} seconds)")]
    InvalidStepDelay(f64),
}

/// Error returned when a metric name cannot be recognised.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown metric '{0}', expected one of: euclidean, chebyshev, manhattan")]
pub struct MetricParseError(pub String);
