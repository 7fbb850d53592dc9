use super::joint::Joint;
use crate::math::Mat4x3;
use crate::{engine_bail, error::Result};

/// A complete keyframe pose: one [`Joint`] (position + orientation) per
/// joint in the owning [`Skeleton`]'s topology.
#[derive(Debug, Clone)]
pub struct KeySkeleton {
    pub joints: Vec<Joint>,
}

impl KeySkeleton {
    pub fn new(joints: Vec<Joint>) -> Self {
        KeySkeleton { joints }
    }
}

/// Joint topology plus up to `K` parallel matrix arrays ("slots") of the
/// same length — one slot per animation stage (relative, absolute, inverse
/// bind, final, ...) so those stages can share one allocation shape instead
/// of each owning a separate `Vec`.
pub struct Skeleton {
    joints: Vec<Joint>,
    slots: Vec<Vec<Mat4x3>>,
}

impl Skeleton {
    pub fn new(joints: Vec<Joint>, n_slots: usize) -> Self {
        let n = joints.len();
        Skeleton { joints, slots: vec![vec![Mat4x3::IDENTITY; n]; n_slots.max(1)] }
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn joints_mut(&mut self) -> &mut [Joint] {
        &mut self.joints
    }

    pub fn slot(&self, slot: usize) -> &[Mat4x3] {
        &self.slots[slot]
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut [Mat4x3] {
        &mut self.slots[slot]
    }

    /// `SortJoints`: reorders joints into a topological order (every
    /// parent index less than its own, a depth-first visit rooted at each
    /// joint in turn) — the invariant [`Skeleton::compute_absolute_joints`]
    /// and [`Skeleton::absolute_into`] depend on. Parent indices are
    /// rewritten to track the reorder.
    pub fn sort_joints(&mut self) {
        let n = self.joints.len();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        for i in 0..n {
            Self::visit_joint(i, &self.joints, &mut visited, &mut order);
        }

        let mut old_to_new = vec![0u32; n];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx as u32;
        }

        self.joints = order
            .iter()
            .map(|&old_idx| {
                let mut j = self.joints[old_idx];
                j.parent = j.parent.map(|p| old_to_new[p as usize]);
                j
            })
            .collect();
    }

    fn visit_joint(i: usize, joints: &[Joint], visited: &mut [bool], order: &mut Vec<usize>) {
        if visited[i] {
            return;
        }
        if let Some(p) = joints[i].parent {
            Self::visit_joint(p as usize, joints, visited, order);
        }
        visited[i] = true;
        order.push(i);
    }

    /// `Skeleton_ComputeAbsoluteJoints`: walks joints in order (parents
    /// always precede children, per [`Skeleton::sort_joints`]), composing
    /// each child's local position/orientation with its parent's already-
    /// absolute one. Mutates `self.joints` from relative to absolute poses.
    pub fn compute_absolute_joints(&mut self) {
        for i in 0..self.joints.len() {
            let Some(parent_idx) = self.joints[i].parent else { continue };
            let parent = self.joints[parent_idx as usize];
            let child = &mut self.joints[i];
            child.position = parent.position + parent.orientation.rotate_v3(child.position);
            child.orientation = parent.orientation.mul(&child.orientation).normalize();
        }
    }

    /// `Skeleton_Absolute`: `dst[i] = src[parent(i)] * src[i]` if joint `i`
    /// has a parent, else `dst[i] = src[i]`. Matrix-space equivalent of
    /// [`Skeleton::compute_absolute_joints`], used once joints have already
    /// been turned into relative matrices.
    pub fn absolute_into(&mut self, src_slot: usize, dst_slot: usize) -> Result<()> {
        if self.slots[src_slot].len() != self.joints.len() || self.slots[dst_slot].len() != self.joints.len() {
            engine_bail!(Precondition, "skeleton slot size does not match joint count");
        }
        let src = self.slots[src_slot].clone();
        let dst = &mut self.slots[dst_slot];
        for i in 0..src.len() {
            dst[i] = match self.joints[i].parent {
                Some(p) => src[p as usize].mul(&src[i]),
                None => src[i],
            };
        }
        Ok(())
    }

    /// `Skeleton_Mul`: elementwise composition `dst[i] = dst[i] ∘ rhs_slot[i]`.
    pub fn mul_into(&mut self, dst_slot: usize, rhs_slot: usize) {
        let rhs = self.slots[rhs_slot].clone();
        for (d, r) in self.slots[dst_slot].iter_mut().zip(rhs.iter()) {
            d.mul_in_place(r);
        }
    }

    /// `Skeleton_MulCopy`: like [`Skeleton::mul_into`] but writes into a
    /// third slot, leaving both operands untouched.
    pub fn mul_copy_into(&mut self, dst_slot: usize, a_slot: usize, b_slot: usize) {
        for i in 0..self.joints.len() {
            self.slots[dst_slot][i] = self.slots[a_slot][i].mul(&self.slots[b_slot][i]);
        }
    }

    /// `Skeleton_Inverse`: inverts every matrix in `src_slot` into `dst_slot`.
    pub fn inverse_into(&mut self, dst_slot: usize, src_slot: usize) {
        for i in 0..self.joints.len() {
            self.slots[dst_slot][i] = self.slots[src_slot][i].inverse();
        }
    }
}

#[cfg(test)]
#[path = "skeleton_tests.rs"]
mod tests;
