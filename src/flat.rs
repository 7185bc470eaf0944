use glam::{DVec2, DVec3, Vec3};

use crate::{
    allocator::Allocator,
    element::{slot, NH},
    error::Error,
    topol::CoherentTriangulation,
};

/// Compact triangulation, with dense node indices and no connectivity.
///
/// This is how triangulations are exchanged with code that produces or
/// consumes them. Optional per-node attributes must have one entry per point.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatTriangulation {
    pub points: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub normals: Option<Vec<Vec3>>,
    pub uvs: Option<Vec<DVec2>>,
    pub deflection: f64,
}

impl CoherentTriangulation {
    /// Build a coherent triangulation from a flat one. Node `i` and triangle
    /// `i` of the result correspond to point `i` and triangle `i` of
    /// `flat`. Links are not computed.
    pub fn from_flat(flat: &FlatTriangulation, alloc: Allocator) -> Result<Self, Error> {
        for attr_len in [
            flat.normals.as_ref().map(|v| v.len()),
            flat.uvs.as_ref().map(|v| v.len()),
        ]
        .into_iter()
        .flatten()
        {
            if attr_len != flat.points.len() {
                return Err(Error::MismatchedArrayLengths(flat.points.len(), attr_len));
            }
        }
        let npoints = flat.points.len();
        if let Some((ti, &index)) = flat.triangles.iter().enumerate().find_map(|(ti, tri)| {
            tri.iter()
                .find(|i| **i as usize >= npoints)
                .map(|i| (ti, i))
        }) {
            return Err(Error::InvalidFlatIndex {
                triangle: ti,
                index,
            });
        }
        let mut mesh = Self::with_capacity(npoints, flat.triangles.len(), alloc);
        mesh.set_deflection(flat.deflection);
        for (i, p) in flat.points.iter().enumerate() {
            let n = mesh.add_node(*p);
            let node = mesh.node_mut(n)?;
            if let Some(normals) = &flat.normals {
                node.set_normal(normals[i]);
            }
            if let Some(uvs) = &flat.uvs {
                node.set_uv(uvs[i]);
            }
        }
        for &[a, b, c] in &flat.triangles {
            mesh.add_triangle(a.into(), b.into(), c.into())?;
        }
        tracing::debug!(
            nodes = npoints,
            triangles = flat.triangles.len(),
            "imported flat triangulation"
        );
        Ok(mesh)
    }

    /// Export the live part of this triangulation.
    ///
    /// Free nodes and empty triangles are skipped, and the remaining ones are
    /// renumbered densely in increasing order of their handles. Normals and
    /// parameters are exported only if every exported node has one.
    pub fn to_flat(&self) -> FlatTriangulation {
        let mut remap: Vec<Option<u32>> = vec![None; self.nodes.len()];
        let mut points = Vec::with_capacity(self.num_nodes());
        let mut normals = Some(Vec::with_capacity(self.num_nodes()));
        let mut uvs = Some(Vec::with_capacity(self.num_nodes()));
        for (n, node) in self.nodes() {
            remap[slot(n)] = Some(points.len() as u32);
            points.push(node.point());
            normals = normals.zip(node.normal()).map(|(mut v, x)| {
                v.push(x);
                v
            });
            uvs = uvs.zip(node.uv()).map(|(mut v, x)| {
                v.push(x);
                v
            });
        }
        let triangles: Vec<[u32; 3]> = self
            .triangles()
            .filter_map(|(_, tri)| tri.nodes())
            .filter_map(|nodes: [NH; 3]| {
                Some([
                    remap[slot(nodes[0])]?,
                    remap[slot(nodes[1])]?,
                    remap[slot(nodes[2])]?,
                ])
            })
            .collect();
        tracing::debug!(
            nodes = points.len(),
            triangles = triangles.len(),
            free = self.nodes.len() - points.len(),
            "exported flat triangulation"
        );
        let has_points = !points.is_empty();
        FlatTriangulation {
            points,
            triangles,
            normals: normals.filter(|_| has_points),
            uvs: uvs.filter(|_| has_points),
            deflection: self.deflection(),
        }
    }
}

impl TryFrom<&FlatTriangulation> for CoherentTriangulation {
    type Error = Error;

    fn try_from(flat: &FlatTriangulation) -> Result<Self, Self::Error> {
        Self::from_flat(flat, Allocator::default())
    }
}

impl From<&CoherentTriangulation> for FlatTriangulation {
    fn from(mesh: &CoherentTriangulation) -> Self {
        mesh.to_flat()
    }
}

/// Number of distinct sides of a flat triangulation. Used to compare
/// connectivity up to renumbering.
#[cfg(test)]
pub(crate) fn count_sides(flat: &FlatTriangulation) -> usize {
    let mut sides: Vec<(u32, u32)> = flat
        .triangles
        .iter()
        .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    sides.sort();
    sides.dedup();
    sides.len()
}

#[cfg(test)]
mod test {
    use glam::{DVec2, DVec3, Vec3};

    use super::{count_sides, FlatTriangulation};
    use crate::{
        error::Error,
        topol::test::{fan, unit_square},
        Allocator, CoherentTriangulation,
    };

    fn square_flat() -> FlatTriangulation {
        FlatTriangulation {
            points: vec![
                DVec3::new(0., 0., 0.),
                DVec3::new(1., 0., 0.),
                DVec3::new(0., 1., 0.),
                DVec3::new(1., 1., 0.),
            ],
            triangles: vec![[0, 1, 2], [1, 3, 2]],
            normals: None,
            uvs: None,
            deflection: 0.5,
        }
    }

    #[test]
    fn t_from_flat() {
        let mesh = CoherentTriangulation::from_flat(&square_flat(), Allocator::default())
            .expect("Cannot import");
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.deflection(), 0.5);
        assert!(!mesh.has_links());
        assert_eq!(
            mesh.triangle(0.into()).expect("Cannot read").neighbor(0),
            Some(1.into())
        );
        mesh.check().expect("Invalid topology");
    }

    #[test]
    fn t_from_flat_errors() {
        let mut flat = square_flat();
        flat.triangles.push([1, 2, 7]);
        assert_eq!(
            CoherentTriangulation::try_from(&flat).err(),
            Some(Error::InvalidFlatIndex {
                triangle: 2,
                index: 7
            })
        );
        let mut flat = square_flat();
        flat.normals = Some(vec![Vec3::Z; 3]);
        assert_eq!(
            CoherentTriangulation::try_from(&flat).err(),
            Some(Error::MismatchedArrayLengths(4, 3))
        );
        let mut flat = square_flat();
        flat.triangles.push([0, 0, 3]);
        assert_eq!(
            CoherentTriangulation::try_from(&flat).err(),
            Some(Error::DegenerateTriangle([0.into(), 0.into(), 3.into()]))
        );
    }

    #[test]
    fn t_round_trip() {
        let flat = square_flat();
        let mesh = CoherentTriangulation::try_from(&flat).expect("Cannot import");
        assert_eq!(mesh.to_flat(), flat);
    }

    #[test]
    fn t_export_compacts() {
        let mut mesh = fan();
        mesh.remove_triangle(1.into()).expect("Cannot remove");
        mesh.remove_triangle(2.into()).expect("Cannot remove");
        let flat = FlatTriangulation::from(&mesh);
        // Node 3 is free and is dropped, node 4 takes its place.
        assert_eq!(flat.points.len(), 4);
        assert_eq!(flat.points[3], DVec3::new(0., -1., 0.));
        assert_eq!(flat.triangles, vec![[0, 1, 2], [0, 3, 1]]);
        assert_eq!(count_sides(&flat), 5);
        let copy = CoherentTriangulation::try_from(&flat).expect("Cannot import");
        assert_eq!(copy.num_triangles(), 2);
        copy.check().expect("Invalid topology");
    }

    #[test]
    fn t_export_attributes() {
        let mut mesh = unit_square();
        for i in 0u32..4 {
            let node = mesh.node_mut(i.into()).expect("Cannot read node");
            node.set_normal(Vec3::Z);
            node.set_uv(DVec2::new(i as f64, 0.));
        }
        let flat = mesh.to_flat();
        assert_eq!(flat.normals, Some(vec![Vec3::Z; 4]));
        assert_eq!(flat.uvs.as_ref().map(|v| v[3]), Some(DVec2::new(3., 0.)));
        let back = CoherentTriangulation::try_from(&flat).expect("Cannot import");
        assert_eq!(back.node(2.into()).expect("Cannot read").normal(), Some(Vec3::Z));
        // One node without a normal drops all normals.
        mesh.node_mut(1.into()).expect("Cannot read node").clear_normal();
        let flat = mesh.to_flat();
        assert_eq!(flat.normals, None);
        assert!(flat.uvs.is_some());
    }
}
