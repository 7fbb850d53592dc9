use glam::Vec3;

/// `(normal, d)` with `DistanceToPoint(p) = dot(n,p) + d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Plane { normal, d }
    }

    /// Builds a plane from a (non-normalized) normal and a point it passes
    /// through; the normal is normalized on construction.
    pub fn from_point(normal: Vec3, point: Vec3) -> Self {
        let n = normal.normalize();
        Plane { normal: n, d: -n.dot(point) }
    }

    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
