use std::fmt::{Debug, Write};

use crate::{
    element::{NH, TH},
    topol::CoherentTriangulation,
};

fn fmt_opt<T: Debug>(x: Option<T>) -> String {
    match x {
        Some(x) => format!("{x:?}"),
        None => "-".to_string(),
    }
}

impl CoherentTriangulation {
    /// Human readable listing of the nodes, triangles and links, meant for
    /// debugging. The format is not stable.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write_dump(&mut out)
            .map(|_| out)
            .unwrap_or_else(|e| format!("<dump failed: {e}>"))
    }

    fn write_dump(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "CoherentTriangulation: {} nodes ({} slots), {} triangles ({} slots), {} links, deflection {}",
            self.num_nodes(),
            self.node_capacity(),
            self.num_triangles(),
            self.triangle_capacity(),
            if self.has_links() {
                self.num_links().to_string()
            } else {
                "no".to_string()
            },
            self.deflection(),
        )?;
        writeln!(out, "Nodes:")?;
        for (n, node) in self.nodes() {
            let p = node.point();
            let mut ring: Vec<TH> = node.triangles().to_vec();
            ring.sort();
            writeln!(out, "  {n}: ({}, {}, {}) ring {ring:?}", p.x, p.y, p.z)?;
        }
        writeln!(out, "Triangles:")?;
        for (t, tri) in self.triangles() {
            let nodes: [NH; 3] = match tri.nodes() {
                Some(nodes) => nodes,
                None => continue,
            };
            write!(out, "  {t}: {nodes:?}")?;
            for i in 0..3 {
                write!(
                    out,
                    " | {i}: {} opp {}",
                    fmt_opt(tri.neighbor(i)),
                    fmt_opt(tri.opposite_node(i))
                )?;
                if let Some(l) = tri.link(i) {
                    write!(out, " link {l}")?;
                }
            }
            writeln!(out)?;
        }
        if self.has_links() {
            writeln!(out, "Links:")?;
            for (l, link) in self.links() {
                writeln!(
                    out,
                    "  {l}: {} opp [{}, {}]",
                    fmt_opt(link.nodes()),
                    fmt_opt(link.opposite_node(0)),
                    fmt_opt(link.opposite_node(1))
                )?;
            }
        }
        Ok(())
    }
}

impl Debug for CoherentTriangulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoherentTriangulation")
            .field("nodes", &self.num_nodes())
            .field("triangles", &self.num_triangles())
            .field("links", &self.num_links())
            .finish_non_exhaustive()
    }
}
