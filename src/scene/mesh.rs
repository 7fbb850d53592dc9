//! CPU skinning: the consumer the skeleton/animation core exists to serve.
//! A mesh's vertices are partitioned
//! into weight ranges against a base (bind-pose) skeleton; each frame the
//! animation core's interpolated joint pose is composed with the stashed
//! inverse bind matrices into per-joint "final" matrices, and every vertex
//! attribute array is recomputed as the weighted sum of its base value
//! transformed by the joints that influence it.

use crate::engine_bail;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Mat4x3;
use crate::skeleton::{Animation, Skeleton};
use glam::Vec3;

/// `(joint id, weight, weighted position)` — one contribution to a vertex's
/// skinned position, expressed in the influencing joint's local space
/// (mirrors the MD5 mesh data contract).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub joint: u32,
    pub weight: f32,
    pub position: Vec3,
}

/// A vertex's weight range: `weight_count` consecutive entries in the
/// mesh's flat [`VertexWeight`] array, starting at `first_weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedVertex {
    pub first_weight: u32,
    pub weight_count: u32,
}

/// Whether a skinned attribute's output buffer is private to this mesh
/// (`Local`) or a shared region of a larger pooled buffer multiple meshes
/// write into (`Global`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPartition {
    Local,
    Global,
}

/// One named per-vertex attribute carried through skinning: its bind-pose
/// (`base`) values and the per-frame skinned (`output`) values, one entry
/// per vertex. A mesh may carry up to four of these (position, normal,
/// tangent, binormal being the conventional set).
pub struct SkinnedAttribute {
    pub kind: crate::device::AttributeKind,
    base: Vec<Vec3>,
    output: Vec<Vec3>,
    pub partition: BufferPartition,
}

impl SkinnedAttribute {
    pub fn base(&self) -> &[Vec3] {
        &self.base
    }

    pub fn output(&self) -> &[Vec3] {
        &self.output
    }
}

const MAX_ATTRIBUTES: usize = 4;

/// Mesh geometry plus the base (bind-pose) and animation skeletons, the
/// per-vertex weight records that bind them, and up to four skinned vertex
/// attributes.
pub struct AnimatedMesh {
    pub geometry: Geometry,
    base_skeleton: Skeleton,
    anim_skeleton: Skeleton,
    inverse_bind: Vec<Mat4x3>,
    vertex_weights: Vec<WeightedVertex>,
    weights: Vec<VertexWeight>,
    attributes: Vec<SkinnedAttribute>,
}

impl AnimatedMesh {
    /// `base_skeleton`'s joints are assumed already absolute (world bind
    /// pose), as a loader (e.g. MD5) reconstructs them; the inverse bind
    /// matrices used every frame are computed once, here.
    pub fn new(
        geometry: Geometry,
        base_skeleton: Skeleton,
        vertex_weights: Vec<WeightedVertex>,
        weights: Vec<VertexWeight>,
    ) -> Self {
        let inverse_bind = base_skeleton
            .joints()
            .iter()
            .map(|j| j.compute_matrix().inverse())
            .collect();
        let anim_skeleton = Skeleton::new(base_skeleton.joints().to_vec(), 2);
        AnimatedMesh {
            geometry,
            base_skeleton,
            anim_skeleton,
            inverse_bind,
            vertex_weights,
            weights,
            attributes: Vec::new(),
        }
    }

    pub fn base_skeleton(&self) -> &Skeleton {
        &self.base_skeleton
    }

    pub fn joint_count(&self) -> usize {
        self.base_skeleton.joint_count()
    }

    pub fn attributes(&self) -> &[SkinnedAttribute] {
        &self.attributes
    }

    /// Registers a skinned attribute; `base` must have one entry per
    /// vertex referenced by [`AnimatedMesh::vertex_weights`]. At most
    /// [`MAX_ATTRIBUTES`] may be registered.
    pub fn add_attribute(
        &mut self,
        kind: crate::device::AttributeKind,
        base: Vec<Vec3>,
        partition: BufferPartition,
    ) -> Result<()> {
        if self.attributes.len() >= MAX_ATTRIBUTES {
            engine_bail!(Precondition, "animated mesh already carries the maximum of {MAX_ATTRIBUTES} attributes");
        }
        if base.len() != self.vertex_weights.len() {
            engine_bail!(
                Precondition,
                "attribute has {} entries, expected one per vertex ({})",
                base.len(),
                self.vertex_weights.len()
            );
        }
        let output = base.clone();
        self.attributes.push(SkinnedAttribute { kind, base, output, partition });
        Ok(())
    }

    /// Advances the per-joint final matrices from `animation`'s current
    /// interpolated key (its relative matrices), composing them with
    /// the stashed inverse bind pose, then re-skins every registered
    /// attribute's output buffer from its base values.
    pub fn skin(&mut self, animation: &Animation) -> Result<()> {
        let key = animation.key();
        if key.len() != self.joint_count() {
            engine_bail!(
                Precondition,
                "animation has {} joints, mesh skeleton has {}",
                key.len(),
                self.joint_count()
            );
        }
        self.anim_skeleton.slot_mut(0).copy_from_slice(key);
        self.anim_skeleton.absolute_into(0, 1)?;

        let finals: Vec<Mat4x3> = self
            .anim_skeleton
            .slot(1)
            .iter()
            .zip(&self.inverse_bind)
            .map(|(absolute, inv_bind)| absolute.mul(inv_bind))
            .collect();

        for attribute in &mut self.attributes {
            for (vertex_idx, vw) in self.vertex_weights.iter().enumerate() {
                let mut acc = Vec3::ZERO;
                let range = vw.first_weight as usize..(vw.first_weight + vw.weight_count) as usize;
                for w in &self.weights[range] {
                    let joint_final = finals[w.joint as usize];
                    acc += w.weight * joint_final.mul_vec3(w.position);
                }
                attribute.output[vertex_idx] = acc;
                let _ = attribute.base[vertex_idx];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
