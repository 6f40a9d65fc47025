//! Per-run search bookkeeping laid out 1:1 with the grid's cells.

use pathscape_core::{CellCoord, Grid};

/// Which search set a node currently belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Membership {
    Unvisited,
    Open,
    Closed,
}

/// Search state for one cell. The cell itself is identified by the node's
/// index, which equals the cell's dense grid index.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) f: f64,
    pub(crate) predecessor: Option<usize>,
    pub(crate) membership: Membership,
}

impl SearchNode {
    const UNREACHED: Self = Self {
        g: f64::INFINITY,
        h: 0.0,
        f: f64::INFINITY,
        predecessor: None,
        membership: Membership::Unvisited,
    };

    pub(crate) fn relax(&mut self, g: f64, h: f64, predecessor: Option<usize>) {
        self.g = g;
        self.h = h;
        self.f = g + h;
        self.predecessor = predecessor;
    }
}

/// Arena of search nodes, discarded and rebuilt for every run.
#[derive(Clone, Debug, Default)]
pub(crate) struct SearchOverlay {
    nodes: Vec<SearchNode>,
}

impl SearchOverlay {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            nodes: vec![SearchNode::UNREACHED; len],
        }
    }

    pub(crate) fn node(&self, index: usize) -> Option<&SearchNode> {
        self.nodes.get(index)
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> Option<&mut SearchNode> {
        self.nodes.get_mut(index)
    }

    pub(crate) fn close(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.membership = Membership::Closed;
        }
    }

    /// Dense indices of every node in the requested set, in row-major order.
    pub(crate) fn indices_with(&self, membership: Membership) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.membership == membership)
            .map(|(index, _)| index)
    }

    /// Walks the predecessor chain from `index` and returns it origin-first.
    ///
    /// The walk is bounded by the arena size, so a corrupted chain can never
    /// loop forever.
    pub(crate) fn construct_path(&self, grid: &Grid, index: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut cursor = Some(index);
        while let Some(current) = cursor {
            if path.len() > self.nodes.len() {
                break;
            }
            let Some(coord) = grid.coord_of(current) else {
                break;
            };
            path.push(coord);
            cursor = self.nodes.get(current).and_then(|node| node.predecessor);
        }

        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscape_core::Terrain;

    #[test]
    fn fresh_overlay_is_unreached() {
        let overlay = SearchOverlay::new(9);

        let node = overlay.node(4).expect("node exists");
        assert!(node.g.is_infinite());
        assert_eq!(node.predecessor, None);
        assert_eq!(overlay.indices_with(Membership::Unvisited).count(), 9);
        assert!(overlay.node(9).is_none());
    }

    #[test]
    fn path_is_reconstructed_origin_first() {
        let grid = Grid::from_fn(3, |_| Terrain::Free);
        let mut overlay = SearchOverlay::new(grid.len());
        overlay.node_mut(0).expect("origin").relax(0.0, 2.0, None);
        overlay.node_mut(4).expect("middle").relax(1.0, 1.0, Some(0));
        overlay.node_mut(8).expect("corner").relax(2.0, 0.0, Some(4));

        assert_eq!(
            overlay.construct_path(&grid, 8),
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 1),
                CellCoord::new(2, 2)
            ]
        );
        assert_eq!(overlay.construct_path(&grid, 0), vec![CellCoord::new(0, 0)]);
    }
}
