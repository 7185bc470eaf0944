use crate::{
    element::{slot, LH, NH, TH},
    error::Error,
    link::link_side,
    topol::CoherentTriangulation,
    triangle::is_degenerate,
};

fn check_nodes(mesh: &CoherentTriangulation) -> Result<(), Error> {
    for (ni, node) in mesh.nodes.iter().enumerate() {
        let n: NH = (ni as u32).into();
        for (k, &t) in node.triangles().iter().enumerate() {
            // Every triangle in the ring must exist, be live and use this node.
            match mesh.triangles.get(slot(t)) {
                Some(tri) if tri.contains(n) => {}
                _ => return Err(Error::InconsistentRing(n, t)),
            }
            // No duplicates.
            if node.triangles()[..k].contains(&t) {
                return Err(Error::InconsistentRing(n, t));
            }
        }
    }
    Ok(())
}

fn check_triangles(mesh: &CoherentTriangulation) -> Result<(), Error> {
    for (ti, tri) in mesh.triangles.iter().enumerate() {
        let t: TH = (ti as u32).into();
        let Some(nodes) = tri.nodes() else {
            if tri.num_connections() > 0 {
                return Err(Error::EmptyTriangle(t));
            }
            continue;
        };
        if let Some(&n) = nodes.iter().find(|n| slot(**n) >= mesh.nodes.len()) {
            return Err(Error::NodeOutOfBounds(n));
        }
        if is_degenerate(&nodes) {
            return Err(Error::DegenerateTriangle(nodes));
        }
        if let Some(&n) = nodes
            .iter()
            .find(|n| !mesh.nodes[slot(**n)].triangles().contains(&t))
        {
            return Err(Error::InconsistentRing(n, t));
        }
        for i in 0..3 {
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            match tri.neighbor(i) {
                Some(u) => {
                    // The neighbor must share this side and point back.
                    let other = mesh
                        .triangles
                        .get(slot(u))
                        .ok_or(Error::AsymmetricNeighbor(t, u))?;
                    let j = other
                        .side_of_edge(a, b)
                        .ok_or(Error::AsymmetricNeighbor(t, u))?;
                    if other.neighbor(j) != Some(t) {
                        return Err(Error::AsymmetricNeighbor(t, u));
                    }
                    if other.edge(j) != Some((b, a)) {
                        return Err(Error::IncoherentNeighbors(t, u));
                    }
                    if tri.opposite_node(i) != other.node(j) {
                        return Err(Error::InvalidOppositeNode(t, i));
                    }
                }
                None => {
                    if tri.opposite_node(i).is_some() {
                        return Err(Error::InvalidOppositeNode(t, i));
                    }
                    // A boundary side must not be shared with anyone.
                    if let Some((u, _)) = mesh.find_other(a, b, Some(t)) {
                        return Err(Error::AsymmetricNeighbor(t, u));
                    }
                }
            }
        }
    }
    Ok(())
}

fn check_links(mesh: &CoherentTriangulation) -> Result<(), Error> {
    let Some(links) = &mesh.links else {
        // Without a link index, no triangle may refer to a link.
        for tri in mesh.triangles.iter() {
            if let Some(l) = tri.links.iter().flatten().next() {
                return Err(Error::InconsistentLink(*l));
            }
        }
        return Ok(());
    };
    for (ti, tri) in mesh.triangles.iter().enumerate() {
        let t: TH = (ti as u32).into();
        let Some(nodes) = tri.nodes() else {
            if let Some(l) = tri.links.iter().flatten().next() {
                return Err(Error::InconsistentLink(*l));
            }
            continue;
        };
        for i in 0..3 {
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            let Some((l, link)) = tri
                .link(i)
                .and_then(|l| links.get(slot(l)).map(|link| (l, link)))
                .filter(|(_, link)| !link.is_empty())
            else {
                return Err(Error::MissingLink(t, i));
            };
            if link.nodes() != Some([a.min(b), a.max(b)]) {
                return Err(Error::InconsistentLink(l));
            }
            let side = link_side(a, b);
            if link.opposite_node(side) != Some(nodes[i]) {
                return Err(Error::InconsistentLink(l));
            }
            match tri.neighbor(i) {
                Some(u) => {
                    let other = &mesh.triangles[slot(u)];
                    if other.side_of_edge(a, b).and_then(|j| other.link(j)) != Some(l) {
                        return Err(Error::InconsistentLink(l));
                    }
                }
                None => {
                    if link.opposite_node(1 - side).is_some() {
                        return Err(Error::InconsistentLink(l));
                    }
                }
            }
        }
    }
    // Every link must agree with the triangles around its edge.
    for (li, link) in links.iter().enumerate() {
        let l: LH = (li as u32).into();
        let Some([a, b]) = link.nodes() else {
            continue;
        };
        if a >= b {
            return Err(Error::InconsistentLink(l));
        }
        let expected = mesh.find_triangle(a, b).map(|t| {
            t.and_then(|t| {
                let tri = &mesh.triangles[slot(t)];
                tri.side_of_edge(a, b).and_then(|j| tri.node(j))
            })
        });
        if expected != link.opposite {
            return Err(Error::InconsistentLink(l));
        }
    }
    Ok(())
}

impl CoherentTriangulation {
    /// Check the connectivity of this triangulation for consistency. This
    /// verifies that the node rings agree with the triangles, that neighbors
    /// refer to each other with correct opposite nodes and traverse their
    /// shared side in opposite directions, and that the links, if computed,
    /// agree with the triangles around their edges.
    pub fn check(&self) -> Result<(), Error> {
        check_nodes(self)?;
        check_triangles(self)?;
        check_links(self)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{slot, LH, NH, TH},
        error::Error,
        topol::test::{fan, unit_square},
    };

    #[test]
    fn t_check_valid() {
        let mut mesh = fan();
        mesh.check().expect("Invalid topology");
        mesh.compute_links();
        mesh.check().expect("Invalid topology");
    }

    #[test]
    fn t_check_asymmetric_neighbor() {
        let mut mesh = unit_square();
        mesh.triangles[1].connected[1] = None;
        mesh.triangles[1].opposite[1] = None;
        assert_eq!(
            mesh.check(),
            Err(Error::AsymmetricNeighbor(TH::from(0), TH::from(1)))
        );
    }

    #[test]
    fn t_check_incoherent_neighbors() {
        let mut mesh = unit_square();
        mesh.remove_triangle(1.into()).expect("Cannot remove");
        // Traverses 1 -> 2 like triangle 0.
        mesh.add_triangle(3.into(), 1.into(), 2.into())
            .expect("Cannot add triangle");
        assert_eq!(
            mesh.check(),
            Err(Error::IncoherentNeighbors(TH::from(0), TH::from(2)))
        );
    }

    #[test]
    fn t_check_opposite_node() {
        let mut mesh = unit_square();
        mesh.triangles[0].opposite[0] = Some(NH::from(2));
        assert_eq!(mesh.check(), Err(Error::InvalidOppositeNode(TH::from(0), 0)));
    }

    #[test]
    fn t_check_ring() {
        let mut mesh = unit_square();
        mesh.nodes[3].remove_triangle(1.into());
        assert_eq!(
            mesh.check(),
            Err(Error::InconsistentRing(NH::from(3), TH::from(1)))
        );
        let mut mesh = unit_square();
        mesh.nodes[0].add_triangle(1.into());
        assert_eq!(
            mesh.check(),
            Err(Error::InconsistentRing(NH::from(0), TH::from(1)))
        );
    }

    #[test]
    fn t_check_links() {
        let mut mesh = unit_square();
        mesh.compute_links();
        let l = mesh
            .find_link(0.into(), 1.into())
            .expect("Cannot find link");
        mesh.links.as_mut().expect("Links are not computed")[slot(l)].opposite[0] =
            Some(NH::from(3));
        assert_eq!(mesh.check(), Err(Error::InconsistentLink(l)));
        let mut mesh = unit_square();
        mesh.compute_links();
        mesh.triangles[1].links[0] = None;
        assert_eq!(mesh.check(), Err(Error::MissingLink(TH::from(1), 0)));
    }

    #[test]
    fn t_check_stale_link() {
        let mut mesh = unit_square();
        mesh.triangles[0].links[2] = Some(LH::from(0));
        assert_eq!(mesh.check(), Err(Error::InconsistentLink(LH::from(0))));
    }
}
