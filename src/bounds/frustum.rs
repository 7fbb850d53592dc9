use super::{BoundingBox, BoundingSphere, Collision, Plane};
use crate::math::Mat4;
use glam::Vec3;

/// Six clipping planes extracted from a view×projection matrix.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the six frustum planes from `view_proj` via the
    /// Gribb-Hartmann method; each plane's normal points inward.
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let m = view_proj.to_cols_array_2d();
        // glam stores matrices column-major: m[col][row].
        let row = |r: usize| Vec3::new(m[0][r], m[1][r], m[2][r]);
        let w = |r: usize| m[3][r];

        let raw = [
            (row(3) + row(0), w(3) + w(0)), // left
            (row(3) - row(0), w(3) - w(0)), // right
            (row(3) + row(1), w(3) + w(1)), // bottom
            (row(3) - row(1), w(3) - w(1)), // top
            (row(3) + row(2), w(3) + w(2)), // near
            (row(3) - row(2), w(3) - w(2)), // far
        ];

        let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];
        for (i, (n, d)) in raw.into_iter().enumerate() {
            let len = n.length();
            let len = if len > 0.0 { len } else { 1.0 };
            planes[i] = Plane::new(n / len, d / len);
        }
        Frustum { planes }
    }

    /// OUT if any plane fully excludes the box, IN if every plane fully
    /// includes it, PARTIALLY otherwise — the classification
    /// `Octree_MarkVisibles` descends on.
    pub fn classify_box(&self, b: &BoundingBox) -> Collision {
        let mut partially = false;
        for plane in &self.planes {
            match plane.classify_box(b) {
                Collision::Out => return Collision::Out,
                Collision::Partially => partially = true,
                Collision::In => {}
            }
        }
        if partially {
            Collision::Partially
        } else {
            Collision::In
        }
    }

    pub fn classify_sphere(&self, s: &BoundingSphere) -> Collision {
        let mut partially = false;
        for plane in &self.planes {
            match plane.classify_sphere(s) {
                Collision::Out => return Collision::Out,
                Collision::Partially => partially = true,
                Collision::In => {}
            }
        }
        if partially {
            Collision::Partially
        } else {
            Collision::In
        }
    }

    pub fn intersects_box(&self, b: &BoundingBox) -> bool {
        !matches!(self.classify_box(b), Collision::Out)
    }

    pub fn intersects_sphere(&self, s: &BoundingSphere) -> bool {
        !matches!(self.classify_sphere(s), Collision::Out)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
