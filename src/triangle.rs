use crate::element::{LH, NH, TH};

/// Triangle of a coherent triangulation.
///
/// The side `i` of a triangle is the edge opposite to its node `i`, i.e. the
/// edge from node `(i + 1) % 3` to node `(i + 2) % 3`. For every side, the
/// triangle keeps the neighboring triangle across it, the node of that
/// neighbor opposite to the side, and the link of the side when links are
/// computed.
///
/// A triangle that was removed from the triangulation is empty. It keeps its
/// slot, so that the handles of other triangles stay valid, but it has no
/// nodes and no connections.
#[derive(Debug, Clone, Default)]
pub struct Triangle {
    nodes: Option<[NH; 3]>,
    pub(crate) connected: [Option<TH>; 3],
    pub(crate) opposite: [Option<NH>; 3],
    pub(crate) links: [Option<LH>; 3],
}

impl Triangle {
    pub(crate) fn new(nodes: [NH; 3]) -> Self {
        Triangle {
            nodes: Some(nodes),
            ..Default::default()
        }
    }

    pub(crate) fn set_nodes(&mut self, nodes: Option<[NH; 3]>) {
        self.nodes = nodes;
    }

    pub fn nodes(&self) -> Option<[NH; 3]> {
        self.nodes
    }

    pub fn node(&self, i: usize) -> Option<NH> {
        self.nodes.and_then(|nodes| nodes.get(i).copied())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_none()
    }

    pub fn contains(&self, n: NH) -> bool {
        self.nodes.is_some_and(|nodes| nodes.contains(&n))
    }

    /// The triangle across side `i`, if any.
    pub fn neighbor(&self, i: usize) -> Option<TH> {
        self.connected.get(i).copied().flatten()
    }

    /// The node of the neighbor across side `i` that is not on this side.
    pub fn opposite_node(&self, i: usize) -> Option<NH> {
        self.opposite.get(i).copied().flatten()
    }

    /// The link of side `i`, if links are computed.
    pub fn link(&self, i: usize) -> Option<LH> {
        self.links.get(i).copied().flatten()
    }

    /// Number of sides that have a neighbor.
    pub fn num_connections(&self) -> usize {
        self.connected.iter().filter(|c| c.is_some()).count()
    }

    /// The two nodes of side `i`, in the order this triangle traverses them.
    pub fn edge(&self, i: usize) -> Option<(NH, NH)> {
        if i > 2 {
            return None;
        }
        self.nodes
            .map(|nodes| (nodes[(i + 1) % 3], nodes[(i + 2) % 3]))
    }

    /// Find the side joining nodes `a` and `b`, in either direction.
    pub fn side_of_edge(&self, a: NH, b: NH) -> Option<usize> {
        let nodes = self.nodes?;
        (0..3).find(|&i| {
            let (x, y) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            (x == a && y == b) || (x == b && y == a)
        })
    }

    /// Find the side across which `t` is connected to this triangle.
    pub fn side_of_neighbor(&self, t: TH) -> Option<usize> {
        self.connected.iter().position(|c| *c == Some(t))
    }

    /// Forget all connections, keeping the nodes.
    pub(crate) fn disconnect(&mut self) {
        self.connected = [None; 3];
        self.opposite = [None; 3];
        self.links = [None; 3];
    }
}

/// Check if any two of the three nodes are the same.
pub(crate) fn is_degenerate(nodes: &[NH; 3]) -> bool {
    nodes[0] == nodes[1] || nodes[1] == nodes[2] || nodes[2] == nodes[0]
}
