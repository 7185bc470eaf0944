use glam::DVec3;

use crate::{
    allocator::Allocator,
    element::{slot, NH, TH},
    error::Error,
    link::{link_side, Link},
    node::Node,
    triangle::{is_degenerate, Triangle},
};

/// Triangulation that keeps the connectivity between its nodes and triangles
/// coherent through any sequence of edits.
///
/// Nodes and triangles live in dense buffers, and refer to each other by
/// handle. Removing a triangle only marks it as empty, and a node that is no
/// longer used by any triangle becomes free. Neither of them is moved, so
/// handles held by the caller keep referring to the same element across
/// edits.
pub struct CoherentTriangulation {
    pub(crate) nodes: Vec<Node>,
    pub(crate) triangles: Vec<Triangle>,
    pub(crate) links: Option<Vec<Link>>,
    deflection: f64,
    alloc: Allocator,
}

impl Default for CoherentTriangulation {
    fn default() -> Self {
        Self::new(Allocator::default())
    }
}

impl Clone for CoherentTriangulation {
    fn clone(&self) -> Self {
        self.clone_in(self.alloc.clone())
    }
}

impl Drop for CoherentTriangulation {
    fn drop(&mut self) {
        self.alloc.release(&self.nodes);
        self.alloc.release(&self.triangles);
        if let Some(links) = &self.links {
            self.alloc.release(links);
        }
    }
}

impl CoherentTriangulation {
    pub fn new(alloc: Allocator) -> Self {
        Self::with_capacity(0, 0, alloc)
    }

    pub fn with_capacity(nnodes: usize, ntriangles: usize, alloc: Allocator) -> Self {
        let mut nodes = Vec::new();
        let mut triangles = Vec::new();
        alloc.reserve(&mut nodes, nnodes);
        alloc.reserve(&mut triangles, ntriangles);
        CoherentTriangulation {
            nodes,
            triangles,
            links: None,
            deflection: 0.,
            alloc,
        }
    }

    pub fn allocator(&self) -> &Allocator {
        &self.alloc
    }

    /// Deep copy of this triangulation, with storage reserved through `alloc`.
    ///
    /// All handles of the copy refer to the same elements as in `self`. The
    /// links are copied if they are computed.
    pub fn clone_in(&self, alloc: Allocator) -> Self {
        fn copy<T: Clone>(alloc: &Allocator, src: &[T]) -> Vec<T> {
            let mut dst = Vec::new();
            alloc.reserve(&mut dst, src.len());
            dst.extend_from_slice(src);
            dst
        }
        let nodes = copy(&alloc, &self.nodes);
        let triangles = copy(&alloc, &self.triangles);
        let links = self.links.as_ref().map(|links| copy(&alloc, links));
        tracing::debug!(
            nodes = nodes.len(),
            triangles = triangles.len(),
            links = links.as_ref().map_or(0, |l| l.len()),
            same_arena = alloc.is_same(&self.alloc),
            "cloned triangulation"
        );
        CoherentTriangulation {
            nodes,
            triangles,
            links,
            deflection: self.deflection,
            alloc,
        }
    }

    /// Maximal distance of the triangulation from the surface it approximates.
    pub fn deflection(&self) -> f64 {
        self.deflection
    }

    pub fn set_deflection(&mut self, deflection: f64) {
        self.deflection = deflection;
    }

    /// Append a new node at `point`.
    pub fn add_node(&mut self, point: DVec3) -> NH {
        let n = (self.nodes.len() as u32).into();
        self.alloc.push(&mut self.nodes, Node::new(point));
        n
    }

    /// Append a new node when `index` is `None`, otherwise move the existing
    /// node at `index` to `point`. Moving a node does not change which
    /// triangles use it.
    pub fn set_node(&mut self, point: DVec3, index: Option<NH>) -> Result<NH, Error> {
        match index {
            None => Ok(self.add_node(point)),
            Some(n) => {
                self.node_mut(n)?.set_point(point);
                Ok(n)
            }
        }
    }

    pub fn node(&self, n: NH) -> Result<&Node, Error> {
        self.nodes.get(slot(n)).ok_or(Error::NodeOutOfBounds(n))
    }

    pub fn node_mut(&mut self, n: NH) -> Result<&mut Node, Error> {
        self.nodes.get_mut(slot(n)).ok_or(Error::NodeOutOfBounds(n))
    }

    pub fn triangle(&self, t: TH) -> Result<&Triangle, Error> {
        self.triangles
            .get(slot(t))
            .ok_or(Error::TriangleOutOfBounds(t))
    }

    /// Number of nodes used by at least one triangle.
    pub fn num_nodes(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_free()).count()
    }

    /// The node with the highest index, free or not.
    pub fn max_node(&self) -> Option<NH> {
        self.nodes.len().checked_sub(1).map(|i| (i as u32).into())
    }

    /// Number of node slots, including free nodes.
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of triangles that are not empty.
    pub fn num_triangles(&self) -> usize {
        self.triangles.iter().filter(|t| !t.is_empty()).count()
    }

    /// The triangle with the highest index, empty or not.
    pub fn max_triangle(&self) -> Option<TH> {
        self.triangles.len().checked_sub(1).map(|i| (i as u32).into())
    }

    /// Number of triangle slots, including empty triangles.
    pub fn triangle_capacity(&self) -> usize {
        self.triangles.len()
    }

    /// Nodes that are not used by any triangle.
    pub fn free_nodes(&self) -> Vec<NH> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_free())
            .map(|(i, _)| (i as u32).into())
            .collect()
    }

    /// Find a triangle other than `exclude` that has `a` and `b` as one of its
    /// sides. Returns the triangle and its side.
    pub(crate) fn find_other(&self, a: NH, b: NH, exclude: Option<TH>) -> Option<(TH, usize)> {
        self.nodes[slot(a)]
            .triangles()
            .iter()
            .filter(|u| Some(**u) != exclude)
            .find_map(|u| {
                self.triangles[slot(*u)]
                    .side_of_edge(a, b)
                    .map(|j| (*u, j))
            })
    }

    /// Check if a triangle with `nodes` can be wired into the triangulation,
    /// ignoring the triangle `exclude`. If `oriented` is set, the triangle
    /// must also traverse every shared side opposite to its neighbor.
    fn validate(&self, nodes: [NH; 3], exclude: Option<TH>, oriented: bool) -> Result<(), Error> {
        if let Some(n) = nodes.iter().find(|n| slot(**n) >= self.nodes.len()) {
            return Err(Error::NodeOutOfBounds(*n));
        }
        if is_degenerate(&nodes) {
            return Err(Error::DegenerateTriangle(nodes));
        }
        let sides = [0usize, 1, 2].map(|i| (nodes[(i + 1) % 3], nodes[(i + 2) % 3]));
        for (a, b) in sides {
            let shared = self.nodes[slot(a)]
                .triangles()
                .iter()
                .filter(|u| {
                    Some(**u) != exclude && self.triangles[slot(**u)].side_of_edge(a, b).is_some()
                })
                .count();
            if shared > 1 {
                return Err(Error::ComplexEdge(a, b));
            }
        }
        if oriented {
            for (a, b) in sides {
                if self.find_other(a, b, exclude).is_some_and(|(u, j)| {
                    self.triangles[slot(u)].edge(j) == Some((a, b))
                }) {
                    return Err(Error::FlippedEdge(a, b));
                }
            }
        }
        Ok(())
    }

    /// Connect the triangle `t` to its neighbors, its nodes and its links. The
    /// triangle must have nodes, and no connections.
    fn wire(&mut self, t: TH) {
        let Some(nodes) = self.triangles[slot(t)].nodes() else {
            return;
        };
        for i in 0..3 {
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            if let Some((u, j)) = self.find_other(a, b, Some(t)) {
                let uopp = self.triangles[slot(u)].node(j);
                let tri = &mut self.triangles[slot(t)];
                tri.connected[i] = Some(u);
                tri.opposite[i] = uopp;
                let other = &mut self.triangles[slot(u)];
                other.connected[j] = Some(t);
                other.opposite[j] = Some(nodes[i]);
            }
        }
        for n in nodes {
            self.nodes[slot(n)].add_triangle(t);
        }
        if self.links.is_some() {
            self.attach_links(t);
        }
        tracing::trace!(triangle = %t, ?nodes, "wired triangle");
    }

    /// Disconnect the triangle `t` from everything and mark it empty. Returns
    /// `false` if it was already empty.
    pub(crate) fn unwire(&mut self, t: TH) -> bool {
        let Some(nodes) = self.triangles[slot(t)].nodes() else {
            return false;
        };
        if self.links.is_some() {
            self.detach_links(t);
        }
        for i in 0..3 {
            let Some(u) = self.triangles[slot(t)].connected[i] else {
                continue;
            };
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            let other = &mut self.triangles[slot(u)];
            if let Some(j) = other.side_of_edge(a, b) {
                if other.connected[j] == Some(t) {
                    other.connected[j] = None;
                    other.opposite[j] = None;
                }
            }
        }
        for n in nodes {
            self.nodes[slot(n)].remove_triangle(t);
        }
        let tri = &mut self.triangles[slot(t)];
        tri.disconnect();
        tri.set_nodes(None);
        tracing::trace!(triangle = %t, ?nodes, "unwired triangle");
        true
    }

    /// Add a triangle with the given nodes.
    ///
    /// The nodes must be distinct, and no side of the new triangle may already
    /// be shared by two triangles. The caller must keep the orientation
    /// coherent: a shared side is traversed in opposite directions by the two
    /// triangles. The triangle is connected to the triangles
    /// it shares sides with, and to the links of its sides if links are
    /// computed. The triangulation is not modified if an error is returned.
    pub fn add_triangle(&mut self, n0: NH, n1: NH, n2: NH) -> Result<TH, Error> {
        let nodes = [n0, n1, n2];
        self.validate(nodes, None, false)?;
        let t = (self.triangles.len() as u32).into();
        self.alloc.push(&mut self.triangles, Triangle::new(nodes));
        self.wire(t);
        Ok(t)
    }

    /// Remove a triangle.
    ///
    /// The neighbors of the triangle lose their connection to it, and nodes
    /// used by no other triangle become free. The triangle keeps its slot as
    /// an empty triangle. Returns `false` if the triangle was already empty.
    pub fn remove_triangle(&mut self, t: TH) -> Result<bool, Error> {
        self.triangle(t)?;
        Ok(self.unwire(t))
    }

    /// Replace the nodes of an existing triangle slot, keeping its handle.
    ///
    /// This is the same as removing the triangle and adding a new one with
    /// the given nodes, except the new triangle reuses the slot `t`. An empty
    /// slot can be filled this way. The new triangle must traverse each side
    /// it shares in the direction opposite to its neighbor, otherwise
    /// `Error::FlippedEdge` is returned. The triangulation is not modified if
    /// an error is returned.
    pub fn replace_nodes(&mut self, t: TH, n0: NH, n1: NH, n2: NH) -> Result<(), Error> {
        self.triangle(t)?;
        let nodes = [n0, n1, n2];
        self.validate(nodes, Some(t), true)?;
        self.unwire(t);
        let tri = &mut self.triangles[slot(t)];
        tri.disconnect();
        tri.set_nodes(Some(nodes));
        self.wire(t);
        Ok(())
    }

    /// Find the triangles that share the edge joining `a` and `b`.
    ///
    /// The first triangle is the one traversing the edge from the smaller
    /// node to the larger node, the second traverses it the other way. This
    /// matches the sides of the link of that edge.
    pub fn find_triangle(&self, a: NH, b: NH) -> [Option<TH>; 2] {
        let mut out = [None; 2];
        if a == b {
            return out;
        }
        let Some(node) = self.nodes.get(slot(a)) else {
            return out;
        };
        for &u in node.triangles() {
            let tri = &self.triangles[slot(u)];
            if let Some((x, y)) = tri.side_of_edge(a, b).and_then(|j| tri.edge(j)) {
                out[link_side(x, y)] = Some(u);
            }
        }
        out
    }
}
