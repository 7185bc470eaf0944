use crate::element::{LH, NH, TH};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    // Access.
    #[error("node {0} is out of bounds")]
    NodeOutOfBounds(NH),
    #[error("triangle {0} is out of bounds")]
    TriangleOutOfBounds(TH),
    #[error("link {0} is out of bounds")]
    LinkOutOfBounds(LH),
    #[error("side {0} is not one of the three sides of a triangle")]
    InvalidSide(usize),
    // Topology.
    #[error("triangle with nodes {0:?} is degenerate")]
    DegenerateTriangle([NH; 3]),
    #[error("edge ({0}, {1}) is already shared by two triangles")]
    ComplexEdge(NH, NH),
    #[error("edge ({0}, {1}) is already traversed in this direction")]
    FlippedEdge(NH, NH),
    #[error("triangle {0} is empty")]
    EmptyTriangle(TH),
    #[error("links have not been computed")]
    LinksNotComputed,
    // Flat triangulation.
    #[error("triangle {triangle} refers to node {index}, which does not exist")]
    InvalidFlatIndex { triangle: usize, index: u32 },
    #[error("array lengths {0} and {1} do not match")]
    MismatchedArrayLengths(usize, usize),
    // Consistency.
    #[error("ring of node {0} disagrees with triangle {1}")]
    InconsistentRing(NH, TH),
    #[error("triangle {0} refers to neighbor {1}, which does not refer back")]
    AsymmetricNeighbor(TH, TH),
    #[error("neighbors {0} and {1} traverse their shared edge in the same direction")]
    IncoherentNeighbors(TH, TH),
    #[error("triangle {0} stores a wrong opposite node on side {1}")]
    InvalidOppositeNode(TH, usize),
    #[error("triangle {0} has no valid link on side {1}")]
    MissingLink(TH, usize),
    #[error("link {0} does not match the triangles around its edge")]
    InconsistentLink(LH),
}
