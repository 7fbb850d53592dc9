//! Quaternion used for joint orientation: `(x, y, z, w)`, backed by
//! `glam::Quat` but re-implementing SLERP/linear blend to match the exact
//! documented semantics (acute-angle selection, normalized linear blend).

use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion(Quat);

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion(Quat::IDENTITY);

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Quaternion(Quat::from_xyzw(x, y, z, w))
    }

    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        Quaternion(Quat::from_axis_angle(axis, angle))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }
    pub fn y(&self) -> f32 {
        self.0.y
    }
    pub fn z(&self) -> f32 {
        self.0.z
    }
    pub fn w(&self) -> f32 {
        self.0.w
    }

    pub(crate) fn into_glam(self) -> Quat {
        self.0
    }

    /// Reconstructs `w` from `(x,y,z)` assuming the quaternion is unit length.
    pub fn compute_w(x: f32, y: f32, z: f32) -> Self {
        let sq = 1.0 - (x * x + y * y + z * z);
        let w = if sq > 0.0 { sq.sqrt() } else { 0.0 };
        Quaternion::new(x, y, z, w)
    }

    pub fn conjugate(&self) -> Self {
        Quaternion(self.0.conjugate())
    }

    pub fn dot(&self, rhs: &Self) -> f32 {
        self.0.dot(rhs.0)
    }

    /// Hamilton product `self * rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        Quaternion(self.0 * rhs.0)
    }

    pub fn mul_v3(&self, v: Vec3) -> Quaternion {
        let qv = Quat::from_xyzw(v.x, v.y, v.z, 0.0);
        Quaternion(self.0 * qv)
    }

    /// Rotates `v` by this (unit) quaternion: `q v q*`.
    pub fn rotate_v3(&self, v: Vec3) -> Vec3 {
        self.0 * v
    }

    pub fn normalize(&self) -> Self {
        Quaternion(self.0.normalize())
    }

    pub fn magnitude(&self) -> f32 {
        self.0.length()
    }

    /// Normalized linear blend (no acute-angle correction).
    pub fn linear(a: &Self, b: &Self, t: f32) -> Self {
        let blended = Quat::from_xyzw(
            a.0.x + (b.0.x - a.0.x) * t,
            a.0.y + (b.0.y - a.0.y) * t,
            a.0.z + (b.0.z - a.0.z) * t,
            a.0.w + (b.0.w - a.0.w) * t,
        );
        Quaternion(blended.normalize())
    }

    /// Spherical linear interpolation with shortest-path (negated-`b`)
    /// handling when `dot(a,b) < 0`.
    pub fn slerp(a: &Self, b: &Self, t: f32) -> Self {
        let mut dot = a.dot(b);
        let mut bx = b.0;
        if dot < 0.0 {
            bx = -bx;
            dot = -dot;
        }

        const EPS: f32 = 1e-5;
        if dot > 1.0 - EPS {
            return Quaternion::linear(a, &Quaternion(bx), t);
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();
        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;

        Quaternion(Quat::from_xyzw(
            a.0.x * s0 + bx.x * s1,
            a.0.y * s0 + bx.y * s1,
            a.0.z * s0 + bx.z * s1,
            a.0.w * s0 + bx.w * s1,
        ))
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

#[cfg(test)]
#[path = "quat_tests.rs"]
mod tests;
