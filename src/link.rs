use crate::{element::NH, triangle::Triangle};

/// Link of a coherent triangulation, i.e. a materialized edge.
///
/// The nodes of a link are sorted, `node(0) < node(1)`. The side 0 of the
/// link is the triangle traversing the edge from `node(0)` to `node(1)`, the
/// side 1 is the triangle traversing it the other way. For each side the link
/// stores the node of that triangle that is not on the edge. A side without
/// a triangle is on the boundary.
#[derive(Debug, Clone, Default)]
pub struct Link {
    nodes: Option<[NH; 2]>,
    pub(crate) opposite: [Option<NH>; 2],
}

impl Link {
    /// Create the link of side `i` of `tri`. `tri` must not be empty.
    pub(crate) fn from_side(tri: &Triangle, i: usize) -> Option<Self> {
        let (a, b) = tri.edge(i)?;
        let mut opposite = [tri.node(i), tri.opposite_node(i)];
        let nodes = if a < b {
            [a, b]
        } else {
            opposite.swap(0, 1);
            [b, a]
        };
        Some(Link {
            nodes: Some(nodes),
            opposite,
        })
    }

    pub fn nodes(&self) -> Option<[NH; 2]> {
        self.nodes
    }

    pub fn node(&self, i: usize) -> Option<NH> {
        self.nodes.and_then(|nodes| nodes.get(i).copied())
    }

    /// The node opposite to this link on the triangle of `side`.
    pub fn opposite_node(&self, side: usize) -> Option<NH> {
        self.opposite.get(side).copied().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_none()
    }

    /// A link is on the boundary if only one of its sides has a triangle.
    pub fn is_boundary(&self) -> bool {
        !self.is_empty() && (self.opposite[0].is_none() || self.opposite[1].is_none())
    }

    pub(crate) fn nullify(&mut self) {
        self.nodes = None;
        self.opposite = [None; 2];
    }
}

/// The side of a link that a triangle traversing the edge from `a` to `b`
/// occupies.
pub(crate) fn link_side(a: NH, b: NH) -> usize {
    if a < b { 0 } else { 1 }
}

#[cfg(test)]
mod test {
    use super::{link_side, Link};
    use crate::triangle::Triangle;

    #[test]
    fn t_from_side() {
        let mut tri = Triangle::new([5.into(), 2.into(), 8.into()]);
        tri.opposite[1] = Some(9.into());
        // Side 1 goes from 8 to 5, so this triangle is on side 1 of the link.
        let link = Link::from_side(&tri, 1).expect("Cannot create link");
        assert_eq!(link.nodes(), Some([5.into(), 8.into()]));
        assert_eq!(link.opposite_node(0), Some(9.into()));
        assert_eq!(link.opposite_node(1), Some(2.into()));
        assert!(!link.is_boundary());
        // Side 0 goes from 2 to 8, and has no neighbor.
        let link = Link::from_side(&tri, 0).expect("Cannot create link");
        assert_eq!(link.nodes(), Some([2.into(), 8.into()]));
        assert_eq!(link.opposite_node(0), Some(5.into()));
        assert_eq!(link.opposite_node(1), None);
        assert!(link.is_boundary());
    }

    #[test]
    fn t_nullify() {
        let tri = Triangle::new([0.into(), 1.into(), 2.into()]);
        let mut link = Link::from_side(&tri, 2).expect("Cannot create link");
        assert!(!link.is_empty());
        link.nullify();
        assert!(link.is_empty());
        assert!(!link.is_boundary());
        assert_eq!(link.node(0), None);
        assert!(Link::from_side(&Triangle::default(), 0).is_none());
    }

    #[test]
    fn t_link_side() {
        assert_eq!(link_side(1.into(), 2.into()), 0);
        assert_eq!(link_side(2.into(), 1.into()), 1);
    }
}
