use crate::{
    element::{slot, LH, NH, TH},
    error::Error,
    link::{link_side, Link},
    topol::CoherentTriangulation,
};

impl CoherentTriangulation {
    /// Check if the links are computed. Once computed, links are kept up to
    /// date by all edits until [`clear_links`](Self::clear_links) is called.
    pub fn has_links(&self) -> bool {
        self.links.is_some()
    }

    pub fn link(&self, l: LH) -> Result<&Link, Error> {
        self.links
            .as_ref()
            .and_then(|links| links.get(slot(l)))
            .ok_or(Error::LinkOutOfBounds(l))
    }

    /// Number of non-empty links.
    pub fn num_links(&self) -> usize {
        self.links
            .as_ref()
            .map_or(0, |links| links.iter().filter(|l| !l.is_empty()).count())
    }

    /// Number of link slots, including empty links.
    pub fn link_capacity(&self) -> usize {
        self.links.as_ref().map_or(0, |links| links.len())
    }

    fn push_link(&mut self, link: Link) -> LH {
        let alloc = self.allocator().clone();
        let links = self.links.get_or_insert_with(Vec::new);
        let l = (links.len() as u32).into();
        alloc.push(links, link);
        l
    }

    fn drop_links(&mut self) {
        if let Some(links) = self.links.take() {
            self.allocator().release(&links);
        }
        for tri in self.triangles.iter_mut() {
            tri.links = [None; 3];
        }
    }

    /// Discard the links, if any, and compute them from scratch. Every edge of
    /// the triangulation gets exactly one link, shared by the two triangles
    /// on either side of it. Returns the number of links.
    pub fn compute_links(&mut self) -> usize {
        self.drop_links();
        let mut links = Vec::new();
        let nedges = self.num_triangles() * 3 / 2 + 1;
        self.allocator().reserve(&mut links, nedges);
        self.links = Some(links);
        for ti in 0..self.triangles.len() {
            for i in 0..3 {
                let tri = &self.triangles[ti];
                if tri.is_empty() || tri.links[i].is_some() {
                    continue;
                }
                let Some(link) = Link::from_side(tri, i) else {
                    continue;
                };
                let neighbor = tri.connected[i];
                let edge = tri.edge(i);
                let l = self.push_link(link);
                self.triangles[ti].links[i] = Some(l);
                if let (Some(u), Some((a, b))) = (neighbor, edge) {
                    let other = &mut self.triangles[slot(u)];
                    if let Some(j) = other.side_of_edge(a, b) {
                        other.links[j] = Some(l);
                    }
                }
            }
        }
        let count = self.num_links();
        tracing::debug!(links = count, "computed links");
        count
    }

    /// Discard all links and remove the references to them from the
    /// triangles.
    pub fn clear_links(&mut self) {
        let count = self.num_links();
        self.drop_links();
        tracing::debug!(links = count, "cleared links");
    }

    /// Create a link for side `side` of the triangle `t`, and assign it to
    /// both triangles sharing that side.
    ///
    /// This does not look for an existing link on this side. Calling this
    /// twice for the same side leaves the first link orphaned.
    pub fn add_link(&mut self, t: TH, side: usize) -> Result<LH, Error> {
        if !self.has_links() {
            return Err(Error::LinksNotComputed);
        }
        if side > 2 {
            return Err(Error::InvalidSide(side));
        }
        let tri = self.triangle(t)?;
        let (Some(link), Some((a, b))) = (Link::from_side(tri, side), tri.edge(side)) else {
            return Err(Error::EmptyTriangle(t));
        };
        let neighbor = tri.connected[side];
        let l = self.push_link(link);
        self.triangles[slot(t)].links[side] = Some(l);
        if let Some(u) = neighbor {
            let other = &mut self.triangles[slot(u)];
            if let Some(j) = other.side_of_edge(a, b) {
                other.links[j] = Some(l);
            }
        }
        Ok(l)
    }

    /// Mark a link as empty. The triangles referring to it are not updated.
    /// Returns `false` if the link was already empty.
    pub fn remove_link(&mut self, l: LH) -> Result<bool, Error> {
        let link = self
            .links
            .as_mut()
            .and_then(|links| links.get_mut(slot(l)))
            .ok_or(Error::LinkOutOfBounds(l))?;
        if link.is_empty() {
            return Ok(false);
        }
        link.nullify();
        Ok(true)
    }

    /// Find the link of the edge joining `a` and `b`.
    pub fn find_link(&self, a: NH, b: NH) -> Option<LH> {
        self.links.as_ref()?;
        let node = self.nodes.get(slot(a))?;
        node.triangles().iter().find_map(|u| {
            let tri = &self.triangles[slot(*u)];
            tri.side_of_edge(a, b).and_then(|j| tri.links[j])
        })
    }

    /// Triangles on either side of a link. See
    /// [`find_triangle`](Self::find_triangle).
    pub fn link_triangles(&self, l: LH) -> Result<[Option<TH>; 2], Error> {
        Ok(match self.link(l)?.nodes() {
            Some([a, b]) => self.find_triangle(a, b),
            None => [None; 2],
        })
    }

    /// Assign links to the sides of the freshly wired triangle `t`, reusing
    /// the links of its neighbors.
    pub(crate) fn attach_links(&mut self, t: TH) {
        let Some(nodes) = self.triangles[slot(t)].nodes() else {
            return;
        };
        for i in 0..3 {
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            let shared = self.triangles[slot(t)].connected[i].and_then(|u| {
                let other = &self.triangles[slot(u)];
                other.side_of_edge(a, b).and_then(|j| other.links[j])
            });
            let reused = shared.and_then(|l| {
                let link = self.links.as_mut()?.get_mut(slot(l))?;
                if link.is_empty() {
                    return None;
                }
                link.opposite[link_side(a, b)] = Some(nodes[i]);
                Some(l)
            });
            match reused {
                Some(l) => self.triangles[slot(t)].links[i] = Some(l),
                None => {
                    if let Err(e) = self.add_link(t, i) {
                        tracing::warn!(triangle = %t, side = i, error = %e, "cannot link side");
                    }
                }
            }
        }
    }

    /// Release the links of the triangle `t`, which is about to be unwired.
    /// Links shared with a neighbor lose this side, the others are removed.
    pub(crate) fn detach_links(&mut self, t: TH) {
        let Some(nodes) = self.triangles[slot(t)].nodes() else {
            return;
        };
        for i in 0..3 {
            let tri = &mut self.triangles[slot(t)];
            let (Some(l), connected) = (tri.links[i].take(), tri.connected[i]) else {
                continue;
            };
            let (a, b) = (nodes[(i + 1) % 3], nodes[(i + 2) % 3]);
            let Some(link) = self.links.as_mut().and_then(|links| links.get_mut(slot(l))) else {
                continue;
            };
            match connected {
                Some(_) => link.opposite[link_side(a, b)] = None,
                None => link.nullify(),
            }
        }
    }
}
