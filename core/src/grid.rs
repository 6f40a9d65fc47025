use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ConfigError, GridError};

/// Location of a single grid cell expressed as `x` (column) and `y` (row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Absolute per-axis offsets between two coordinates.
    #[must_use]
    pub fn deltas(self, other: CellCoord) -> (u32, u32) {
        (self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Whether the two cells touch, including diagonally.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        let (dx, dy) = self.deltas(other);
        dx.max(dy) == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain classification assigned to every cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground with no traversal penalty.
    Free,
    /// Walkable ground that adds the difficulty penalty on entry.
    Difficult,
    /// Impassable cell.
    Blocked,
    /// Origin of every search.
    Start,
    /// Goal of every search.
    End,
}

impl Terrain {
    /// Whether a search may enter the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Blocked)
    }

    /// Single-character representation used by the text grid format.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Free => '.',
            Self::Difficult => '~',
            Self::Blocked => '#',
            Self::Start => 'S',
            Self::End => 'E',
        }
    }

    /// Parses a glyph produced by [`Terrain::glyph`].
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Free),
            '~' => Some(Self::Difficult),
            '#' => Some(Self::Blocked),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            _ => None,
        }
    }

    const fn code(self) -> u8 {
        match self {
            Self::Free => 0,
            Self::Difficult => 1,
            Self::Blocked => 2,
            Self::Start => 3,
            Self::End => 4,
        }
    }
}

/// A single grid cell, immutable once the grid is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    coord: CellCoord,
    terrain: Terrain,
}

impl Cell {
    /// Creates a new cell at the provided coordinate.
    #[must_use]
    pub const fn new(coord: CellCoord, terrain: Terrain) -> Self {
        Self { coord, terrain }
    }

    /// Coordinate identifying the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Terrain assigned to the cell.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }
}

/// Located start and end cells of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoints {
    /// Cell every search begins from.
    pub start: CellCoord,
    /// Cell every search is trying to reach.
    pub end: CellCoord,
}

/// Square grid of cells stored densely in row-major order.
///
/// A grid is built wholesale and never partially mutated; regeneration
/// replaces the whole value. Consumers should index cells by coordinate
/// rather than relying on the iteration order of [`Grid::cells`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid by classifying every coordinate with the provided closure.
    pub fn from_fn<F>(size: u32, mut classify: F) -> Self
    where
        F: FnMut(CellCoord) -> Terrain,
    {
        let side = usize::try_from(size).unwrap_or(0);
        let mut cells = Vec::with_capacity(side.saturating_mul(side));
        for y in 0..size {
            for x in 0..size {
                let coord = CellCoord::new(x, y);
                cells.push(Cell::new(coord, classify(coord)));
            }
        }

        Self { size, cells }
    }

    /// Parses a grid from text rows, one row per `y`, using [`Terrain::glyph`] characters.
    pub fn from_rows<S>(rows: &[S]) -> Result<Self, GridError>
    where
        S: AsRef<str>,
    {
        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let side = rows.len();
        let mut terrain = Vec::with_capacity(side * side);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref().trim();
            let found = row.chars().count();
            if found != side {
                return Err(GridError::NotSquare {
                    row: y,
                    expected: side,
                    found,
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let parsed =
                    Terrain::from_glyph(glyph).ok_or(GridError::UnknownGlyph { glyph, x, y })?;
                terrain.push(parsed);
            }
        }

        let size = u32::try_from(side).map_err(|_| GridError::NotSquare {
            row: 0,
            expected: side,
            found: side,
        })?;
        let mut glyphs = terrain.into_iter();
        Ok(Self::from_fn(size, |_| glyphs.next().unwrap_or(Terrain::Blocked)))
    }

    /// Side length of the grid in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Every cell of the grid.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.x() < self.size && coord.y() < self.size
    }

    /// Dense index of the coordinate, if it lies inside the grid.
    #[must_use]
    pub fn index_of(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }

        let side = usize::try_from(self.size).ok()?;
        let x = usize::try_from(coord.x()).ok()?;
        let y = usize::try_from(coord.y()).ok()?;
        Some(y * side + x)
    }

    /// Coordinate stored at the dense index, if it lies inside the grid.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Option<CellCoord> {
        self.cells.get(index).map(Cell::coord)
    }

    /// Cell stored at the coordinate.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index_of(coord).and_then(|index| self.cells.get(index))
    }

    /// Terrain stored at the coordinate.
    #[must_use]
    pub fn terrain(&self, coord: CellCoord) -> Option<Terrain> {
        self.cell(coord).map(Cell::terrain)
    }

    /// Number of cells classified with the provided terrain.
    #[must_use]
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.terrain() == terrain)
            .count()
    }

    /// In-grid Moore neighbours of a cell, row by row from the top-left.
    pub fn neighbors(&self, coord: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        const OFFSETS: [(i32, i32); 8] = [
            (-1, -1),
            (0, -1),
            (1, -1),
            (-1, 0),
            (1, 0),
            (-1, 1),
            (0, 1),
            (1, 1),
        ];

        OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let x = coord.x().checked_add_signed(dx)?;
            let y = coord.y().checked_add_signed(dy)?;
            let neighbor = CellCoord::new(x, y);
            self.contains(neighbor).then_some(neighbor)
        })
    }

    /// Locates the single start and end cells.
    ///
    /// Start problems are reported before end problems.
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let starts: Vec<CellCoord> = self.coords_with(Terrain::Start).collect();
        let ends: Vec<CellCoord> = self.coords_with(Terrain::End).collect();

        let start = match starts.as_slice() {
            [] => return Err(ConfigError::NoStart),
            [start] => *start,
            many => return Err(ConfigError::MultipleStarts { count: many.len() }),
        };
        let end = match ends.as_slice() {
            [] => return Err(ConfigError::NoEnd),
            [end] => *end,
            many => return Err(ConfigError::MultipleEnds { count: many.len() }),
        };

        Ok(Endpoints { start, end })
    }

    /// SHA-256 digest of the grid's size and terrain, stable across runs.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.size.to_le_bytes());
        for cell in &self.cells {
            hasher.update([cell.terrain().code()]);
        }

        let digest = hasher.finalize();
        let mut bytes = [0_u8; 32];
        bytes.copy_from_slice(&digest);
        bytes
    }

    fn coords_with(&self, terrain: Terrain) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .filter(move |cell| cell.terrain() == terrain)
            .map(Cell::coord)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = usize::try_from(self.size).map_err(|_| fmt::Error)?;
        if side == 0 {
            return Ok(());
        }

        for (y, row) in self.cells.chunks(side).enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.terrain().glyph())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rows_parse_into_row_major_cells() {
        let grid = Grid::from_rows(&["S.#", "~..", "..E"]).expect("grid parses");

        assert_eq!(grid.size(), 3);
        assert_eq!(grid.terrain(CellCoord::new(2, 0)), Some(Terrain::Blocked));
        assert_eq!(grid.terrain(CellCoord::new(0, 1)), Some(Terrain::Difficult));
        assert_eq!(grid.index_of(CellCoord::new(1, 2)), Some(7));
        assert_eq!(grid.coord_of(7), Some(CellCoord::new(1, 2)));
        assert_eq!(grid.to_string(), "S.#\n~..\n..E");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = Grid::from_rows(&["S..", "..", "..E"]).expect_err("ragged grid");
        assert_eq!(
            error,
            GridError::NotSquare {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn unknown_glyphs_are_rejected() {
        let error = Grid::from_rows(&["S.", "?E"]).expect_err("unknown glyph");
        assert_eq!(error, GridError::UnknownGlyph { glyph: '?', x: 0, y: 1 });
    }

    #[test]
    fn corner_cells_have_three_neighbors() {
        let grid = Grid::from_fn(4, |_| Terrain::Free);

        let corner: Vec<_> = grid.neighbors(CellCoord::new(0, 0)).collect();
        assert_eq!(
            corner,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1)
            ]
        );
        assert_eq!(grid.neighbors(CellCoord::new(2, 2)).count(), 8);
        assert_eq!(grid.neighbors(CellCoord::new(3, 1)).count(), 5);
    }

    #[test]
    fn endpoints_require_exactly_one_start_and_end() {
        let grid = Grid::from_rows(&["S.", ".E"]).expect("grid parses");
        assert_eq!(
            grid.endpoints(),
            Ok(Endpoints {
                start: CellCoord::new(0, 0),
                end: CellCoord::new(1, 1),
            })
        );

        let no_end = Grid::from_rows(&["S.", ".."]).expect("grid parses");
        assert_eq!(no_end.endpoints(), Err(ConfigError::NoEnd));

        let two_starts = Grid::from_rows(&["SS", ".E"]).expect("grid parses");
        assert_eq!(
            two_starts.endpoints(),
            Err(ConfigError::MultipleStarts { count: 2 })
        );
    }

    #[test]
    fn fingerprint_tracks_terrain() {
        let first = Grid::from_rows(&["S.", ".E"]).expect("grid parses");
        let second = Grid::from_rows(&["S.", ".E"]).expect("grid parses");
        let changed = Grid::from_rows(&["S#", ".E"]).expect("grid parses");

        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_ne!(first.fingerprint(), changed.fingerprint());
    }
}
