use coherent_mesh::{Allocator, CoherentTriangulation, Handle, NH, TH};
use glam::DVec3;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Remove(u32),
    Restore(usize),
    Replace(u32, usize),
    ComputeLinks,
    ClearLinks,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u32..48).prop_map(Op::Remove),
        3 => (0usize..32).prop_map(Op::Restore),
        2 => (0u32..48, 0usize..32).prop_map(|(t, u)| Op::Replace(t, u)),
        1 => Just(Op::ComputeLinks),
        1 => Just(Op::ClearLinks),
    ]
}

fn sides(nodes: [NH; 3]) -> [(NH, NH); 3] {
    [
        (nodes[1], nodes[2]),
        (nodes[2], nodes[0]),
        (nodes[0], nodes[1]),
    ]
}

/// Checks the invariants of the triangulation through its public interface.
fn verify(mesh: &CoherentTriangulation, slots: &[Option<[NH; 3]>]) -> Result<(), TestCaseError> {
    prop_assert_eq!(mesh.check(), Ok(()));
    // Every slot holds what was last put in it.
    prop_assert_eq!(mesh.triangle_capacity(), slots.len());
    for (i, expected) in slots.iter().enumerate() {
        let tri = mesh.triangle((i as u32).into()).expect("Cannot read triangle");
        prop_assert_eq!(tri.nodes(), *expected);
    }
    prop_assert_eq!(mesh.num_triangles(), slots.iter().flatten().count());
    // Neighbors refer to each other.
    for (t, tri) in mesh.triangles() {
        for (i, u) in mesh.triangle_neighbors(t) {
            let (a, b) = tri.edge(i).expect("Live triangle has no edge");
            let other = mesh.triangle(u).expect("Cannot read neighbor");
            let j = other.side_of_edge(a, b);
            prop_assert!(j.is_some());
            prop_assert_eq!(j.and_then(|j| other.neighbor(j)), Some(t));
        }
    }
    // Rings contain exactly the live triangles using the node.
    for (n, node) in mesh.nodes() {
        for &t in node.triangles() {
            prop_assert!(mesh.triangle(t).expect("Cannot read").contains(n));
        }
    }
    for (t, tri) in mesh.triangles() {
        for n in tri.nodes().expect("Live triangle has no nodes") {
            prop_assert!(mesh.node_triangles(n).any(|u| u == t));
        }
    }
    let used: Vec<NH> = {
        let mut used: Vec<NH> = slots.iter().flatten().flatten().copied().collect();
        used.sort();
        used.dedup();
        used
    };
    prop_assert_eq!(mesh.num_nodes(), used.len());
    for n in mesh.free_nodes() {
        prop_assert!(!used.contains(&n));
    }
    // Links agree with the triangles around their edges.
    if mesh.has_links() {
        let mut edges: Vec<(NH, NH)> = slots
            .iter()
            .flatten()
            .flat_map(|nodes| sides(*nodes))
            .map(|(a, b)| (a.min(b), a.max(b)))
            .collect();
        edges.sort();
        edges.dedup();
        prop_assert_eq!(mesh.num_links(), edges.len());
        for (l, link) in mesh.links() {
            let [a, b] = link.nodes().expect("Link has no nodes");
            let around = mesh.link_triangles(l).expect("Cannot find triangles");
            prop_assert_eq!(around, mesh.find_triangle(a, b));
            for (side, t) in around.iter().enumerate() {
                let expected = t.and_then(|t| {
                    let tri = mesh.triangle(t).ok()?;
                    tri.side_of_edge(a, b).and_then(|j| tri.node(j))
                });
                prop_assert_eq!(link.opposite_node(side), expected);
            }
        }
        for (_, tri) in mesh.triangles() {
            for i in 0..3 {
                let (a, b) = tri.edge(i).expect("Live triangle has no edge");
                let l = tri.link(i);
                prop_assert!(l.is_some());
                prop_assert_eq!(l, mesh.find_link(a, b));
            }
        }
    } else {
        prop_assert_eq!(mesh.links().count(), 0);
    }
    Ok(())
}

proptest! {
    #[test]
    fn t_random_edits(ops in prop::collection::vec(op(), 1..40)) {
        let mut mesh = CoherentTriangulation::grid(4, 4, 1.).expect("Cannot create grid");
        let original: Vec<[NH; 3]> = mesh.triangles().filter_map(|(_, t)| t.nodes()).collect();
        let mut slots: Vec<Option<[NH; 3]>> = original.iter().copied().map(Some).collect();
        for op in ops {
            match op {
                Op::Remove(t) => {
                    let result = mesh.remove_triangle(t.into());
                    match slots.get_mut(t as usize) {
                        Some(slot) => {
                            prop_assert_eq!(result, Ok(slot.is_some()));
                            *slot = None;
                        }
                        None => prop_assert!(result.is_err()),
                    }
                }
                Op::Restore(u) => {
                    let nodes = original[u];
                    if slots.contains(&Some(nodes)) {
                        continue;
                    }
                    let t = mesh
                        .add_triangle(nodes[0], nodes[1], nodes[2])
                        .expect("Cannot restore triangle");
                    // Always a fresh slot.
                    prop_assert_eq!(t.index() as usize, slots.len());
                    slots.push(Some(nodes));
                }
                Op::Replace(t, u) => {
                    let nodes = original[u];
                    let ti = t as usize;
                    if ti >= slots.len() {
                        prop_assert!(mesh.replace_nodes(t.into(), nodes[0], nodes[1], nodes[2]).is_err());
                        continue;
                    }
                    if slots.iter().enumerate().any(|(i, s)| i != ti && *s == Some(nodes)) {
                        continue;
                    }
                    mesh.replace_nodes(t.into(), nodes[0], nodes[1], nodes[2])
                        .expect("Cannot replace nodes");
                    slots[ti] = Some(nodes);
                }
                Op::ComputeLinks => {
                    mesh.compute_links();
                }
                Op::ClearLinks => mesh.clear_links(),
            }
            verify(&mesh, &slots)?;
        }
        // Export and import again, up to renumbering.
        let flat = mesh.to_flat();
        prop_assert_eq!(flat.triangles.len(), mesh.num_triangles());
        prop_assert_eq!(flat.points.len(), mesh.num_nodes());
        let back = CoherentTriangulation::from_flat(&flat, Allocator::default())
            .expect("Cannot import");
        prop_assert_eq!(back.check(), Ok(()));
        prop_assert_eq!(back.to_flat(), flat);
    }

    #[test]
    fn t_collapse_leaves_no_close_nodes(moves in prop::collection::vec((0u32..25, 0u32..25), 1..8)) {
        const TOLERANCE: f64 = 0.1;
        let mut mesh = CoherentTriangulation::grid(4, 4, 1.).expect("Cannot create grid");
        mesh.compute_links();
        for (n, m) in moves {
            if n == m {
                continue;
            }
            let target = mesh.node(m.into()).expect("Cannot read node").point();
            mesh.set_node(target + DVec3::new(0.01, 0., 0.), Some(n.into()))
                .expect("Cannot move node");
        }
        let merged = mesh.remove_degenerated(TOLERANCE);
        prop_assert_eq!(mesh.check(), Ok(()));
        for &(removed, kept) in &merged {
            prop_assert!(kept < removed);
            prop_assert!(mesh.node(removed).expect("Cannot read node").is_free());
        }
        let live: Vec<(NH, DVec3)> = mesh.nodes().map(|(n, node)| (n, node.point())).collect();
        for (i, (_, p)) in live.iter().enumerate() {
            for (_, q) in &live[(i + 1)..] {
                prop_assert!(p.distance(*q) >= TOLERANCE);
            }
        }
        prop_assert!(mesh.remove_degenerated(TOLERANCE).is_empty());
        // The maintained links match links computed from scratch.
        let num_links = mesh.num_links();
        let mut copy = mesh.clone();
        prop_assert_eq!(copy.compute_links(), num_links);
        prop_assert_eq!(copy.check(), Ok(()));
        // Triangles are only ever removed or moved, never added.
        prop_assert!(mesh.num_triangles() <= 32);
        prop_assert!(mesh.triangle_capacity() == 32);
        prop_assert!(mesh.triangles().all(|(t, _): (TH, _)| t.index() < 32));
    }
}
