use glam::{DVec2, DVec3, Vec3};
use smallvec::SmallVec;

use crate::element::TH;

/// Node of a coherent triangulation.
///
/// Apart from its position, a node keeps the ring of triangles incident on
/// it. The ring is maintained by the triangulation and can only be read from
/// here. A node with an empty ring is considered free.
#[derive(Debug, Clone)]
pub struct Node {
    point: DVec3,
    normal: Option<Vec3>,
    uv: Option<DVec2>,
    tolerance: f64,
    ring: SmallVec<[TH; 8]>,
}

impl Node {
    pub(crate) fn new(point: DVec3) -> Self {
        Node {
            point,
            normal: None,
            uv: None,
            tolerance: 0.,
            ring: SmallVec::new(),
        }
    }

    pub fn point(&self) -> DVec3 {
        self.point
    }

    pub fn set_point(&mut self, point: DVec3) {
        self.point = point;
    }

    pub fn normal(&self) -> Option<Vec3> {
        self.normal
    }

    /// Set the normal of this node. The normal is stored as given, without
    /// normalization.
    pub fn set_normal(&mut self, normal: Vec3) {
        self.normal = Some(normal);
    }

    pub fn clear_normal(&mut self) {
        self.normal = None;
    }

    /// Parameters of this node on the underlying surface, if any.
    pub fn uv(&self) -> Option<DVec2> {
        self.uv
    }

    pub fn set_uv(&mut self, uv: DVec2) {
        self.uv = Some(uv);
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Negative values are clamped to zero.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.tolerance = tolerance.max(0.);
    }

    /// A node is free when no triangle refers to it.
    pub fn is_free(&self) -> bool {
        self.ring.is_empty()
    }

    /// Triangles incident on this node, in no particular order.
    pub fn triangles(&self) -> &[TH] {
        &self.ring
    }

    /// Number of triangles incident on this node.
    pub fn valence(&self) -> usize {
        self.ring.len()
    }

    pub(crate) fn add_triangle(&mut self, t: TH) {
        if !self.ring.contains(&t) {
            self.ring.push(t);
        }
    }

    pub(crate) fn remove_triangle(&mut self, t: TH) -> bool {
        match self.ring.iter().position(|x| *x == t) {
            Some(i) => {
                self.ring.swap_remove(i);
                true
            }
            None => false,
        }
    }
}
