use super::Plane;
use crate::math::Mat4x3;
use glam::Vec3;

/// Axis-aligned bounding box stored as 8 canonical corner points:
/// `p0=o`, `p1=o+(w,0,0)`, `p2=o+(w,h,0)`, `p3=o+(0,h,0)`,
/// `p4=o+(0,h,d)`, `p5=o+(w,h,d)`, `p6=o+(w,0,d)`, `p7=o+(0,0,d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    p: [Vec3; 8],
    olds: [Vec3; 8],
    pushed: bool,
}

impl BoundingBox {
    pub fn new() -> Self {
        BoundingBox { p: [Vec3::ZERO; 8], olds: [Vec3::ZERO; 8], pushed: false }
    }

    pub fn set(&mut self, o: Vec3, w: f32, h: f32, d: f32) {
        self.p[0] = o;
        self.p[1] = o + Vec3::new(w, 0.0, 0.0);
        self.p[2] = o + Vec3::new(w, h, 0.0);
        self.p[3] = o + Vec3::new(0.0, h, 0.0);
        self.p[4] = o + Vec3::new(0.0, h, d);
        self.p[5] = o + Vec3::new(w, h, d);
        self.p[6] = o + Vec3::new(w, 0.0, d);
        self.p[7] = o + Vec3::new(0.0, 0.0, d);
    }

    pub fn from_origin(o: Vec3, w: f32, h: f32, d: f32) -> Self {
        let mut b = BoundingBox::new();
        b.set(o, w, h, d);
        b
    }

    pub fn set_from_center(&mut self, c: Vec3, w: f32, h: f32, d: f32) {
        let origin = c - Vec3::new(w, h, d) * 0.5;
        self.set(origin, w, h, d);
    }

    pub fn from_center(c: Vec3, w: f32, h: f32, d: f32) -> Self {
        let mut b = BoundingBox::new();
        b.set_from_center(c, w, h, d);
        b
    }

    pub fn set_size(&mut self, w: f32, h: f32, d: f32) {
        let c = self.center();
        self.set_from_center(c, w, h, d);
    }

    pub fn set_center(&mut self, c: Vec3) {
        let dir = c - self.center();
        for p in &mut self.p {
            *p += dir;
        }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            (self.p[1].x - self.p[0].x) / 2.0 + self.p[0].x,
            (self.p[2].y - self.p[1].y) / 2.0 + self.p[1].y,
            (self.p[7].z - self.p[0].z) / 2.0 + self.p[0].z,
        )
    }

    pub fn origin(&self) -> Vec3 {
        self.p[0]
    }

    pub fn points(&self) -> &[Vec3; 8] {
        &self.p
    }

    pub fn width(&self) -> f32 {
        self.p[1].x - self.p[0].x
    }
    pub fn height(&self) -> f32 {
        self.p[2].y - self.p[1].y
    }
    pub fn depth(&self) -> f32 {
        self.p[7].z - self.p[0].z
    }

    /// Near/far/left/right/up/down planes, all inward-facing, derived from
    /// points 1, 6, 0, 2 as reference corners.
    pub fn make_planes(&self) -> [Plane; 6] {
        let p = &self.p;
        [
            Plane::from_point(p[1] - p[6], p[1]),  // near
            Plane::from_point(p[6] - p[1], p[6]),  // far
            Plane::from_point(p[1] - p[0], p[1]),  // left
            Plane::from_point(p[0] - p[1], p[0]),  // right
            Plane::from_point(p[1] - p[2], p[1]),  // up
            Plane::from_point(p[2] - p[1], p[2]),  // down
        ]
    }

    /// Applies `m` to every corner, caching the pre-transform corners.
    /// A no-op while already pushed.
    pub fn push(&mut self, m: &Mat4x3) {
        if self.pushed {
            return;
        }
        self.olds = self.p;
        for p in &mut self.p {
            m.mul_vec3_in_place(p);
        }
        self.pushed = true;
    }

    pub fn pop(&mut self) {
        if self.pushed {
            self.p = self.olds;
            self.pushed = false;
        }
    }

    pub fn is_pushed(&self) -> bool {
        self.pushed
    }

    /// Fully contains `other` (used by loose/normal octree insertion).
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        let (smin, smax) = self.min_max();
        let (omin, omax) = other.min_max();
        smin.x <= omin.x
            && smin.y <= omin.y
            && smin.z <= omin.z
            && smax.x >= omax.x
            && smax.y >= omax.y
            && smax.z >= omax.z
    }

    pub fn min_max(&self) -> (Vec3, Vec3) {
        (self.p[0], self.p[5])
    }

    /// Smallest box enclosing every point, or the zero-sized box at the
    /// origin if `points` is empty.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return BoundingBox::new();
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let size = max - min;
        BoundingBox::from_origin(min, size.x, size.y, size.z)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::new()
    }
}

#[cfg(test)]
#[path = "aabb_tests.rs"]
mod tests;
