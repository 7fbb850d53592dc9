use super::joint::Joint;
use super::skeleton::KeySkeleton;
use crate::math::{Mat4x3, Quaternion};

/// The three keyframe interpolation modes. All three produce one relative
/// matrix per joint; `Linear`/`Slerp` interpolate joint position/
/// orientation first and derive the matrix, `Matrix` blends the two keys'
/// already-derived matrices componentwise with no joint-space work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolator {
    Linear,
    Slerp,
    Matrix,
}

impl Interpolator {
    fn blend_joint(self, a: &Joint, b: &Joint, t: f32) -> Mat4x3 {
        match self {
            Interpolator::Linear => {
                let pos = a.position.lerp(b.position, t);
                let rot = Quaternion::linear(&a.orientation, &b.orientation, t);
                Mat4x3::from_translation_rotation(pos, rot)
            }
            Interpolator::Slerp => {
                let pos = a.position.lerp(b.position, t);
                let rot = Quaternion::slerp(&a.orientation, &b.orientation, t);
                Mat4x3::from_translation_rotation(pos, rot)
            }
            Interpolator::Matrix => Mat4x3::blend(&a.compute_matrix(), &b.compute_matrix(), t),
        }
    }

    /// Interpolates every joint of `k1`/`k2` at weight `t` into `out`
    /// (must be at least as long as the shorter of the two keys).
    pub fn interpolate_into(self, k1: &KeySkeleton, k2: &KeySkeleton, t: f32, out: &mut [Mat4x3]) {
        for (i, (a, b)) in k1.joints.iter().zip(k2.joints.iter()).enumerate() {
            out[i] = self.blend_joint(a, b, t);
        }
    }

    /// Interpolates only the joints named in `indices`, leaving the rest of
    /// `out` untouched.
    pub fn interpolate_indices_into(self, k1: &KeySkeleton, k2: &KeySkeleton, t: f32, indices: &[usize], out: &mut [Mat4x3]) {
        for &i in indices {
            out[i] = self.blend_joint(&k1.joints[i], &k2.joints[i], t);
        }
    }
}

#[cfg(test)]
#[path = "interpolate_tests.rs"]
mod tests;
