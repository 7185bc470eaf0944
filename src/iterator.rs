use std::{iter::Enumerate, slice::Iter};

use crate::{
    element::{slot, LH, NH, TH},
    link::Link,
    node::Node,
    topol::CoherentTriangulation,
    triangle::Triangle,
};

/// Iterator over the nodes of a triangulation that are not free.
pub struct NodeIter<'a> {
    inner: Enumerate<Iter<'a, Node>>,
}

/// Iterator over the triangles of a triangulation that are not empty.
pub struct TriangleIter<'a> {
    inner: Enumerate<Iter<'a, Triangle>>,
}

/// Iterator over the links of a triangulation that are not empty.
pub struct LinkIter<'a> {
    inner: Option<Enumerate<Iter<'a, Link>>>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = (NH, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find(|(_, node)| !node.is_free())
            .map(|(i, node)| ((i as u32).into(), node))
    }
}

impl<'a> Iterator for TriangleIter<'a> {
    type Item = (TH, &'a Triangle);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find(|(_, tri)| !tri.is_empty())
            .map(|(i, tri)| ((i as u32).into(), tri))
    }
}

impl<'a> Iterator for LinkIter<'a> {
    type Item = (LH, &'a Link);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .find(|(_, link)| !link.is_empty())
            .map(|(i, link)| ((i as u32).into(), link))
    }
}

impl CoherentTriangulation {
    pub fn nodes(&self) -> NodeIter<'_> {
        NodeIter {
            inner: self.nodes.iter().enumerate(),
        }
    }

    pub fn triangles(&self) -> TriangleIter<'_> {
        TriangleIter {
            inner: self.triangles.iter().enumerate(),
        }
    }

    /// Iterate over the links. This is empty if links are not computed.
    pub fn links(&self) -> LinkIter<'_> {
        LinkIter {
            inner: self.links.as_ref().map(|links| links.iter().enumerate()),
        }
    }

    /// Triangles incident on the node `n`, in no particular order.
    pub fn node_triangles(&self, n: NH) -> impl Iterator<Item = TH> + use<'_> {
        self.nodes
            .get(slot(n))
            .into_iter()
            .flat_map(|node| node.triangles().iter().copied())
    }

    /// Nodes sharing an edge with the node `n`. Every neighbor appears once.
    pub fn node_neighbors(&self, n: NH) -> impl Iterator<Item = NH> + use<'_> {
        let mut out: Vec<NH> = self
            .node_triangles(n)
            .flat_map(|t| self.triangles[slot(t)].nodes().into_iter().flatten())
            .filter(|m| *m != n)
            .collect();
        out.sort();
        out.dedup();
        out.into_iter()
    }

    /// Neighbors of the triangle `t`, along with the side of `t` they are
    /// across.
    pub fn triangle_neighbors(&self, t: TH) -> impl Iterator<Item = (usize, TH)> + use<'_> {
        self.triangles
            .get(slot(t))
            .into_iter()
            .flat_map(|tri| (0..3).filter_map(move |i| tri.neighbor(i).map(|u| (i, u))))
    }
}
