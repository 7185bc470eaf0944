use glam::DVec3;
use smallvec::SmallVec;

use crate::{
    element::{slot, NH, TH},
    topol::CoherentTriangulation,
};

impl CoherentTriangulation {
    fn distance(&self, a: NH, b: NH) -> f64 {
        self.nodes[slot(a)]
            .point()
            .distance(self.nodes[slot(b)].point())
    }

    /// Nodes `a` and `b` merge when closer than this.
    fn pair_tolerance(&self, a: NH, b: NH, tolerance: f64) -> f64 {
        tolerance
            .max(self.nodes[slot(a)].tolerance())
            .max(self.nodes[slot(b)].tolerance())
    }

    /// The largest tolerance of any live node, or `tolerance` if that is larger.
    fn widest_tolerance(&self, tolerance: f64) -> f64 {
        self.nodes()
            .map(|(_, node)| node.tolerance())
            .fold(tolerance, f64::max)
    }

    /// Reconnect every triangle using `discard` to `keep`. Triangles that use
    /// both nodes collapse and are removed. `discard` is free afterwards.
    fn merge_nodes(&mut self, keep: NH, discard: NH) {
        let ring = self.nodes[slot(discard)].triangles();
        let (collapsed, moved): (SmallVec<[TH; 8]>, SmallVec<[TH; 8]>) = ring
            .iter()
            .copied()
            .partition(|t| self.triangles[slot(*t)].contains(keep));
        for t in collapsed {
            self.unwire(t);
        }
        for t in moved {
            let Some(mut nodes) = self.triangles[slot(t)].nodes() else {
                continue;
            };
            for n in nodes.iter_mut().filter(|n| **n == discard) {
                *n = keep;
            }
            if let Err(e) = self.replace_nodes(t, nodes[0], nodes[1], nodes[2]) {
                tracing::warn!(triangle = %t, error = %e, "dropping triangle while merging nodes");
                self.unwire(t);
            }
        }
        tracing::trace!(%keep, %discard, "merged nodes");
    }

    /// Merge the nodes of short triangle sides, in increasing order of
    /// triangles. Returns the number of merges.
    fn collapse_short_sides(&mut self, tolerance: f64, merged: &mut Vec<(NH, NH)>) -> usize {
        let before = merged.len();
        for ti in 0..self.triangles.len() {
            // A merge removes this triangle, which ends the loop.
            while let Some(nodes) = self.triangles[ti].nodes() {
                let Some((a, b)) = (0..3)
                    .map(|i| (nodes[(i + 1) % 3], nodes[(i + 2) % 3]))
                    .find(|&(a, b)| self.distance(a, b) < self.pair_tolerance(a, b, tolerance))
                else {
                    break;
                };
                let (keep, discard) = (a.min(b), a.max(b));
                self.merge_nodes(keep, discard);
                merged.push((discard, keep));
            }
        }
        merged.len() - before
    }

    /// Merge pairs of close nodes that don't share a side. Pairs are found by
    /// sweeping the nodes sorted along x, and merged in increasing order.
    /// Returns the number of merges.
    fn collapse_close_nodes(&mut self, tolerance: f64, merged: &mut Vec<(NH, NH)>) -> usize {
        let window = self.widest_tolerance(tolerance);
        let mut order: Vec<(NH, DVec3)> = self.nodes().map(|(n, node)| (n, node.point())).collect();
        order.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        let mut pairs = Vec::new();
        for (i, &(a, p)) in order.iter().enumerate() {
            for &(b, q) in order[(i + 1)..]
                .iter()
                .take_while(|(_, q)| q.x - p.x < window)
            {
                if p.distance(q) < self.pair_tolerance(a, b, tolerance) {
                    pairs.push((a.min(b), a.max(b)));
                }
            }
        }
        pairs.sort();
        let before = merged.len();
        for (keep, discard) in pairs {
            // Either node may have been consumed by an earlier merge.
            if self.nodes[slot(keep)].is_free() || self.nodes[slot(discard)].is_free() {
                continue;
            }
            self.merge_nodes(keep, discard);
            merged.push((discard, keep));
        }
        merged.len() - before
    }

    /// Merge all pairs of nodes closer than `tolerance`, removing the
    /// triangles that collapse as a result. A pair of nodes also merges when
    /// closer than the tolerance of either node. A negative or NaN
    /// `tolerance` counts as zero.
    ///
    /// The node with the lower index is kept, and every triangle referring to
    /// the other node is reconnected to it. A triangle that cannot be
    /// reconnected without sharing a side with two other triangles, or
    /// without traversing a shared side in the same direction as its
    /// neighbor, is removed instead. Merges are repeated until no live nodes
    /// are close. Returns the merged pairs as `(removed, kept)`, in the order
    /// they were merged.
    pub fn remove_degenerated(&mut self, tolerance: f64) -> Vec<(NH, NH)> {
        let mut merged = Vec::new();
        let tolerance = tolerance.max(0.);
        if self.widest_tolerance(tolerance) <= 0. {
            return merged;
        }
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let count = self.collapse_short_sides(tolerance, &mut merged)
                + self.collapse_close_nodes(tolerance, &mut merged);
            if count == 0 {
                break;
            }
        }
        tracing::debug!(
            tolerance,
            merged = merged.len(),
            rounds,
            "removed degenerated nodes"
        );
        merged
    }
}
