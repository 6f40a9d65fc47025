//! Open set with deterministic minimum-`f` selection.

use std::cmp::Ordering;

use crate::overlay::{Membership, SearchOverlay};

/// Two `f` values closer than this are treated as a tie.
const F_TIE_EPSILON: f64 = 1e-9;

/// Frontier of discovered but unexpanded nodes, keyed by dense cell index.
///
/// Membership is mirrored in the overlay so that a node can never be
/// inserted twice.
#[derive(Clone, Debug, Default)]
pub(crate) struct OpenSet {
    members: Vec<usize>,
}

impl OpenSet {
    pub(crate) fn clear(&mut self) {
        self.members.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    /// Adds a node unless it is already open. Closed nodes are reopened.
    pub(crate) fn push(&mut self, overlay: &mut SearchOverlay, index: usize) -> bool {
        let Some(node) = overlay.node_mut(index) else {
            return false;
        };
        if node.membership == Membership::Open {
            return false;
        }

        node.membership = Membership::Open;
        self.members.push(index);
        true
    }

    /// Removes and returns the best candidate.
    ///
    /// Candidates within [`F_TIE_EPSILON`] of the minimum `f` compete on the
    /// smaller heuristic when `tie_break` is set, and then on the smaller
    /// dense index (row-major: lower `y`, then lower `x`).
    pub(crate) fn pop_best(&mut self, overlay: &SearchOverlay, tie_break: bool) -> Option<usize> {
        let f_of = |index: usize| overlay.node(index).map_or(f64::INFINITY, |node| node.f);
        let h_of = |index: usize| overlay.node(index).map_or(f64::INFINITY, |node| node.h);

        let min_f = self
            .members
            .iter()
            .map(|&index| f_of(index))
            .fold(f64::INFINITY, f64::min);

        let position = self
            .members
            .iter()
            .enumerate()
            .filter(|&(_, &index)| f_of(index) <= min_f + F_TIE_EPSILON)
            .min_by(|&(_, &a), &(_, &b)| {
                let heuristic = if tie_break {
                    h_of(a).total_cmp(&h_of(b))
                } else {
                    Ordering::Equal
                };
                heuristic.then_with(|| a.cmp(&b))
            })
            .map(|(position, _)| position)?;

        Some(self.members.swap_remove(position))
    }
}
