use crate::math::Mat4x3;
use glam::Vec3;

/// Center + radius, plus a stashed pre-transform pair so the sphere can be
/// temporarily transformed (`push`) and restored (`pop`); `push` is a no-op
/// while already pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
    ocenter: Vec3,
    oradius: f32,
    pushed: bool,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        BoundingSphere { center, radius, ocenter: center, oradius: radius, pushed: false }
    }

    /// Applies `m`'s rotation and translation (and takes the largest scale
    /// factor along any axis of `m`'s linear part to grow the radius).
    pub fn push(&mut self, m: &Mat4x3) {
        if self.pushed {
            return;
        }
        self.ocenter = self.center;
        self.oradius = self.radius;

        let scale = m.rot.x_axis.length().max(m.rot.y_axis.length()).max(m.rot.z_axis.length());
        self.center = m.mul_vec3(self.center);
        self.radius *= scale;
        self.pushed = true;
    }

    pub fn pop(&mut self) {
        if self.pushed {
            self.center = self.ocenter;
            self.radius = self.oradius;
            self.pushed = false;
        }
    }

    pub fn is_pushed(&self) -> bool {
        self.pushed
    }
}

impl BoundingSphere {
    /// Centers on the enclosing box's center and radii out to the farthest
    /// point. Not the minimal bounding sphere, but cheap and stable — the
    /// same tradeoff the enclosing-box center/radius approach always makes.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return BoundingSphere::new(Vec3::ZERO, 0.0);
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let center = (min + max) * 0.5;
        let radius = points.iter().map(|p| (*p - center).length()).fold(0.0f32, f32::max);
        BoundingSphere::new(center, radius)
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        BoundingSphere::new(Vec3::ZERO, 0.0)
    }
}

#[cfg(test)]
#[path = "sphere_tests.rs"]
mod tests;
