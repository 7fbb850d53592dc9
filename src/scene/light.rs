use crate::bounds::BoundingSphere;
use crate::math::Mat4x3;
use crate::node::{NodeId, Tree};
use glam::{Vec3, Vec4};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`Light`] owned by a [`super::Scene`].
    pub struct LightId;
}

/// Node, color, derived position/direction, intensity, attenuation,
/// spot angle, and an infinite (directional) flag. Position and
/// direction are not stored — they're read off the owning node's final
/// matrix each time they're needed, so a moved node is reflected with no
/// extra bookkeeping.
pub struct Light {
    node: NodeId,
    pub color: Vec4,
    pub intensity: f32,
    pub attenuation_radius: f32,
    pub angle: f32,
    pub infinite: bool,
    sphere: BoundingSphere,
}

impl Light {
    pub fn new(node: NodeId, color: Vec4, intensity: f32, attenuation_radius: f32) -> Self {
        Light {
            node,
            color,
            intensity,
            attenuation_radius,
            angle: std::f32::consts::PI,
            infinite: false,
            sphere: BoundingSphere::new(Vec3::ZERO, attenuation_radius),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// World-space position, read off the owning node's final matrix.
    pub fn position(&self, tree: &Tree) -> Vec3 {
        tree.node(self.node).map(|n| n.final_matrix().pos).unwrap_or(Vec3::ZERO)
    }

    /// World-space forward direction (-Z of the node's final rotation).
    pub fn direction(&self, tree: &Tree) -> Vec3 {
        tree.node(self.node).map(|n| n.final_matrix().rot * Vec3::NEG_Z).unwrap_or(Vec3::NEG_Z)
    }

    /// A bounding sphere sized by the attenuation radius, centered on the
    /// node's current position — used by the octree/culler to decide
    /// whether this light affects a given region.
    pub fn bounding_sphere(&mut self, tree: &Tree) -> &BoundingSphere {
        self.sphere.center = self.position(tree);
        self.sphere.radius = self.attenuation_radius;
        &self.sphere
    }

    /// `final = camera_view * node.final` — the "feed camera matrix to
    /// lights" step, producing the view-space matrix a lighting
    /// pass consumes.
    pub fn view_space_matrix(&self, tree: &Tree, camera_view: &Mat4x3) -> Mat4x3 {
        let node_final = tree.node(self.node).map(|n| *n.final_matrix()).unwrap_or(Mat4x3::IDENTITY);
        camera_view.mul(&node_final)
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
