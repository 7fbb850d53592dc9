//! Matrix types: 3×3 and 4×4 are re-used from `glam`; the affine 4×3 used by
//! joints, skeleton matrix slots, and pseudo-instancing is a thin engine
//! type so it can be blended componentwise and shipped as three row
//! vectors (the `a1,a2,a3` vertex attributes used for per-instance matrices).

use super::Quaternion;
use glam::{Mat3 as GlamMat3, Vec3, Vec4};

pub type Mat3 = GlamMat3;
pub type Mat4 = glam::Mat4;

/// Row-major affine transform: 3×3 linear part `rot` plus translation `pos`.
/// Conceptually the 4×3 matrix `[rot | pos]` (3 rows of 4 components each).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4x3 {
    pub rot: Mat3,
    pub pos: Vec3,
}

impl Mat4x3 {
    pub const IDENTITY: Mat4x3 = Mat4x3 { rot: Mat3::IDENTITY, pos: Vec3::ZERO };

    pub fn from_translation_rotation(pos: Vec3, rot: Quaternion) -> Self {
        Mat4x3 { rot: Mat3::from_quat(rot.into_glam()), pos }
    }

    pub fn from_translation(pos: Vec3) -> Self {
        Mat4x3 { rot: Mat3::IDENTITY, pos }
    }

    /// `self ∘ rhs`: applies `rhs` first, then `self` — matches
    /// `Skeleton_Absolute`'s `dst[i] = src[parent(i)] × src[i]`.
    pub fn mul(&self, rhs: &Mat4x3) -> Mat4x3 {
        Mat4x3 { rot: self.rot * rhs.rot, pos: self.rot * rhs.pos + self.pos }
    }

    /// In-place variant of [`Mat4x3::mul`]: `self ← self ∘ rhs`.
    pub fn mul_in_place(&mut self, rhs: &Mat4x3) {
        *self = self.mul(rhs);
    }

    pub fn inverse(&self) -> Mat4x3 {
        let inv_rot = self.rot.inverse();
        Mat4x3 { rot: inv_rot, pos: -(inv_rot * self.pos) }
    }

    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        self.rot * v + self.pos
    }

    /// In-place point transform: `v ← self * v`.
    pub fn mul_vec3_in_place(&self, v: &mut Vec3) {
        *v = self.mul_vec3(*v);
    }

    pub fn to_mat4(self) -> Mat4 {
        Mat4::from_cols(
            self.rot.x_axis.extend(0.0),
            self.rot.y_axis.extend(0.0),
            self.rot.z_axis.extend(0.0),
            self.pos.extend(1.0),
        )
    }

    /// The three row-vectors `(m[i][0..3], translation[i])`, in the order
    /// pseudo-instancing ships them into vertex attributes `a1,a2,a3`.
    pub fn rows(&self) -> [Vec4; 3] {
        [
            Vec4::new(self.rot.x_axis.x, self.rot.y_axis.x, self.rot.z_axis.x, self.pos.x),
            Vec4::new(self.rot.x_axis.y, self.rot.y_axis.y, self.rot.z_axis.y, self.pos.y),
            Vec4::new(self.rot.x_axis.z, self.rot.y_axis.z, self.rot.z_axis.z, self.pos.z),
        ]
    }

    /// Componentwise blend of two 4×3 matrices — the "matrix" interpolation
    /// animation interpolation mode, which does no explicit joint decomposition.
    pub fn blend(a: &Mat4x3, b: &Mat4x3, t: f32) -> Mat4x3 {
        Mat4x3 {
            rot: Mat3::from_cols(
                a.rot.x_axis.lerp(b.rot.x_axis, t),
                a.rot.y_axis.lerp(b.rot.y_axis, t),
                a.rot.z_axis.lerp(b.rot.z_axis, t),
            ),
            pos: a.pos.lerp(b.pos, t),
        }
    }
}

impl Default for Mat4x3 {
    fn default() -> Self {
        Mat4x3::IDENTITY
    }
}

#[cfg(test)]
#[path = "mat_tests.rs"]
mod tests;
