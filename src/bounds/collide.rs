use super::{BoundingBox, BoundingSphere, Plane};
use glam::Vec3;

/// Result of a bounding-volume classification test.
///
/// `In` = fully inside/contained, `Out` = fully outside/disjoint,
/// `Partially` = straddles the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    In,
    Out,
    Partially,
}

impl Plane {
    pub fn classify_point(&self, p: Vec3) -> Collision {
        let d = self.distance_to_point(p);
        if d > 0.0 {
            Collision::In
        } else if d < 0.0 {
            Collision::Out
        } else {
            Collision::Partially
        }
    }

    pub fn classify_sphere(&self, s: &BoundingSphere) -> Collision {
        let d = self.distance_to_point(s.center);
        if d > s.radius {
            Collision::In
        } else if d < -s.radius {
            Collision::Out
        } else {
            Collision::Partially
        }
    }

    pub fn classify_box(&self, b: &BoundingBox) -> Collision {
        let mut in_count = 0;
        let mut out_count = 0;
        for p in b.points() {
            if self.distance_to_point(*p) >= 0.0 {
                in_count += 1;
            } else {
                out_count += 1;
            }
        }
        if out_count == 0 {
            Collision::In
        } else if in_count == 0 {
            Collision::Out
        } else {
            Collision::Partially
        }
    }
}

impl BoundingBox {
    pub fn classify_point(&self, p: Vec3) -> Collision {
        let (min, max) = self.min_max();
        if p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y && p.z >= min.z && p.z <= max.z {
            Collision::In
        } else {
            Collision::Out
        }
    }

    /// Classifies `s` against this box: `In` if the box fully contains the
    /// sphere, `Out` if disjoint, `Partially` if the sphere straddles a face.
    pub fn classify_sphere(&self, s: &BoundingSphere) -> Collision {
        let (min, max) = self.min_max();
        let mut closest = Vec3::ZERO;
        let mut fully_contains = true;
        for axis in 0..3 {
            let (c, mn, mx) = match axis {
                0 => (s.center.x, min.x, max.x),
                1 => (s.center.y, min.y, max.y),
                _ => (s.center.z, min.z, max.z),
            };
            let clamped = c.clamp(mn, mx);
            match axis {
                0 => closest.x = clamped,
                1 => closest.y = clamped,
                _ => closest.z = clamped,
            }
            if c - s.radius < mn || c + s.radius > mx {
                fully_contains = false;
            }
        }
        let dist_sq = (closest - s.center).length_squared();
        if dist_sq > s.radius * s.radius {
            Collision::Out
        } else if fully_contains {
            Collision::In
        } else {
            Collision::Partially
        }
    }

    /// `In` if `other` is fully inside `self`, `Out` if disjoint, else
    /// `Partially`. Used by octree descent.
    pub fn classify_box(&self, other: &BoundingBox) -> Collision {
        if self.contains_box(other) {
            return Collision::In;
        }
        let (smin, smax) = self.min_max();
        let (omin, omax) = other.min_max();
        let disjoint = smax.x < omin.x
            || smin.x > omax.x
            || smax.y < omin.y
            || smin.y > omax.y
            || smax.z < omin.z
            || smin.z > omax.z;
        if disjoint {
            Collision::Out
        } else {
            Collision::Partially
        }
    }
}

impl BoundingSphere {
    pub fn classify_point(&self, p: Vec3) -> Collision {
        let d2 = (p - self.center).length_squared();
        if d2 <= self.radius * self.radius {
            Collision::In
        } else {
            Collision::Out
        }
    }

    pub fn classify_box(&self, b: &BoundingBox) -> Collision {
        match b.classify_sphere(self) {
            Collision::In => Collision::In,
            Collision::Out => Collision::Out,
            Collision::Partially => Collision::Partially,
        }
    }

    pub fn classify_sphere(&self, other: &BoundingSphere) -> Collision {
        let d = (other.center - self.center).length();
        if d + other.radius <= self.radius {
            Collision::In
        } else if d > self.radius + other.radius {
            Collision::Out
        } else {
            Collision::Partially
        }
    }

    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        !matches!(self.classify_sphere(other), Collision::Out)
    }
}

#[cfg(test)]
#[path = "collide_tests.rs"]
mod tests;
