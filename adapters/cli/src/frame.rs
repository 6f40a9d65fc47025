//! Plain-text rendering of a search in progress.

use std::fmt::Write as _;

use pathscape_core::{CellCoord, Grid, Terrain};
use pathscape_system_pathfinder::Pathfinder;

const PATH_GLYPH: char = '*';
const CLOSED_GLYPH: char = 'x';
const OPEN_GLYPH: char = 'o';

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    None,
    Open,
    Closed,
    Path,
}

/// Draws the grid with the engine's open set, closed set and current path
/// layered over the terrain. Endpoints always keep their own glyphs.
pub(crate) fn render(grid: &Grid, engine: &Pathfinder) -> String {
    let mut marks = vec![Mark::None; grid.len()];
    let mut paint = |cells: &[CellCoord], mark: Mark| {
        for &cell in cells {
            if let Some(index) = grid.index_of(cell) {
                marks[index] = mark;
            }
        }
    };
    paint(engine.open_cells().as_slice(), Mark::Open);
    paint(engine.closed_cells().as_slice(), Mark::Closed);
    paint(engine.current_path(), Mark::Path);

    let side = grid.size() as usize;
    let mut out = String::with_capacity(grid.len() + side);
    for (index, cell) in grid.cells().iter().enumerate() {
        if index > 0 && index % side == 0 {
            out.push('\n');
        }
        let glyph = match (cell.terrain(), marks[index]) {
            (Terrain::Start | Terrain::End, _) | (_, Mark::None) => cell.terrain().glyph(),
            (_, Mark::Path) => PATH_GLYPH,
            (_, Mark::Closed) => CLOSED_GLYPH,
            (_, Mark::Open) => OPEN_GLYPH,
        };
        out.push(glyph);
    }
    out
}

/// Lowercase hex encoding of a grid fingerprint.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        })
}
