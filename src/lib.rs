/*!
A triangle mesh data structure that keeps its connectivity coherent while it
is being edited.

# Overview

+ A [`CoherentTriangulation`] stores nodes (points in 3D) and triangles in
  dense buffers that refer to each other through handles: [`NH`] for nodes,
  [`TH`] for triangles and [`LH`] for links.

+ Every triangle knows the neighboring triangle across each of its sides, and
  the node of that neighbor opposite to the side. Every node knows the ring of
  triangles incident on it. These are kept up to date by all edits:
  [`add_triangle`](CoherentTriangulation::add_triangle),
  [`remove_triangle`](CoherentTriangulation::remove_triangle),
  [`replace_nodes`](CoherentTriangulation::replace_nodes) and
  [`remove_degenerated`](CoherentTriangulation::remove_degenerated).

+ Optionally, the edges of the triangulation can be materialized as
  [`Link`]s with [`compute_links`](CoherentTriangulation::compute_links).
  From then on, the links are maintained along with the triangles.

+ Removed triangles are never compacted away. They keep their slot as empty
  triangles, so handles held by the caller stay valid across edits. A node
  used by no triangle is free. The iterators skip empty triangles and free
  nodes.

+ [`FlatTriangulation`] is a compact representation without connectivity, used
  to import and export triangulations.

+ Storage is reserved through an [`Allocator`] handle that can be shared by
  many triangulations.

```rust
use coherent_mesh::{CoherentTriangulation, NH, TH};
use glam::DVec3;

let mut mesh = CoherentTriangulation::default();
for p in [DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1., 1., 0.)] {
    mesh.add_node(p);
}
let t0 = mesh.add_triangle(0.into(), 1.into(), 2.into()).unwrap();
let t1 = mesh.add_triangle(1.into(), 3.into(), 2.into()).unwrap();
assert_eq!(mesh.find_triangle(1.into(), 2.into()), [Some(t0), Some(t1)]);
assert_eq!(mesh.compute_links(), 5);
mesh.remove_triangle(t0).unwrap();
assert_eq!(mesh.free_nodes(), vec![NH::from(0)]);
assert_eq!(mesh.triangles().map(|(t, _)| t).collect::<Vec<TH>>(), vec![t1]);
```
*/

mod allocator;
mod check;
mod collapse;
mod dump;
mod element;
mod error;
mod flat;
mod iterator;
mod link;
mod links;
mod macros;
mod node;
mod primitive;
mod topol;
mod triangle;

pub use allocator::Allocator;
pub use element::{Handle, LH, NH, TH};
pub use error::Error;
pub use flat::FlatTriangulation;
pub use iterator::{LinkIter, NodeIter, TriangleIter};
pub use link::Link;
pub use node::Node;
pub use topol::CoherentTriangulation;
pub use triangle::Triangle;
