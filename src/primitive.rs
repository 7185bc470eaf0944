use glam::DVec3;

use crate::{allocator::Allocator, error::Error, topol::CoherentTriangulation};

impl CoherentTriangulation {
    /// Make a regular grid of `nx` by `ny` squares in the XY plane, each split
    /// into two triangles. The node at column `i` and row `j` has index
    /// `j * (nx + 1) + i` and is at `(i, j, 0) * spacing`.
    ///
    /// ```text
    ///   v01-----v11
    ///    |  \    |
    ///    |    \  |
    ///   v00-----v10
    /// ```
    pub fn grid(nx: u32, ny: u32, spacing: f64) -> Result<Self, Error> {
        let nnodes = (nx as usize + 1) * (ny as usize + 1);
        let ntriangles = 2 * nx as usize * ny as usize;
        let mut mesh = Self::with_capacity(nnodes, ntriangles, Allocator::default());
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.add_node(DVec3::new(i as f64, j as f64, 0.) * spacing);
            }
        }
        for j in 0..ny {
            for i in 0..nx {
                let v00 = j * (nx + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + nx + 1;
                let v11 = v01 + 1;
                mesh.add_triangle(v00.into(), v10.into(), v01.into())?;
                mesh.add_triangle(v10.into(), v11.into(), v01.into())?;
            }
        }
        Ok(mesh)
    }

    /// Make a closed tetrahedron with outward facing triangles.
    ///
    /// ```text
    ///        3
    ///       /|\
    ///      / | \
    ///     /  2  \
    ///    / /   \ \
    ///   0---------1
    /// ```
    pub fn tetrahedron() -> Result<Self, Error> {
        const POS: [[f64; 3]; 4] = [[0., 0., 0.], [1., 0., 0.], [0., 1., 0.], [0., 0., 1.]];
        const IDX: [(u32, u32, u32); 4] = [(0, 2, 1), (0, 1, 3), (1, 2, 3), (0, 3, 2)];
        let mut mesh = Self::with_capacity(4, 4, Allocator::default());
        for p in POS {
            mesh.add_node(DVec3::from_array(p));
        }
        for (a, b, c) in IDX {
            mesh.add_triangle(a.into(), b.into(), c.into())?;
        }
        Ok(mesh)
    }
}
