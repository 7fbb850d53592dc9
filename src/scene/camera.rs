use crate::bounds::{BoundingSphere, Frustum};
use crate::math::Mat4;
use crate::node::{NodeId, Tree};
use glam::Vec3;

/// Viewport rectangle in pixels. Scissor/window management is out of
/// scope; this is the data contract a `Camera` carries for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Viewport { x, y, width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// View, projection, their inverses, the combined view×projection and its
/// inverse, a viewport, a derived frustum, a node-positioning bounding
/// sphere, and the owning [`crate::node::Node`] the camera rides on.
pub struct Camera {
    node: NodeId,
    view: Mat4,
    projection: Mat4,
    view_inv: Mat4,
    projection_inv: Mat4,
    view_proj: Mat4,
    view_proj_inv: Mat4,
    viewport: Viewport,
    frustum: Frustum,
    sphere: BoundingSphere,
}

impl Camera {
    pub fn new(node: NodeId, viewport: Viewport) -> Self {
        let view = Mat4::IDENTITY;
        let projection = Mat4::IDENTITY;
        Camera {
            node,
            view,
            projection,
            view_inv: view,
            projection_inv: projection,
            view_proj: projection * view,
            view_proj_inv: Mat4::IDENTITY,
            viewport,
            frustum: Frustum::from_view_projection(&(projection * view)),
            sphere: BoundingSphere::default(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view_matrix_inverse(&self) -> &Mat4 {
        &self.view_inv
    }

    pub fn projection_matrix_inverse(&self) -> &Mat4 {
        &self.projection_inv
    }

    pub fn view_projection_matrix(&self) -> &Mat4 {
        &self.view_proj
    }

    pub fn view_projection_matrix_inverse(&self) -> &Mat4 {
        &self.view_proj_inv
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// The camera's node-positioning handle — a zero-extent bounding sphere
    /// re-centered by [`Camera::update_from_node`] every frame.
    pub fn sphere(&self) -> &BoundingSphere {
        &self.sphere
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.view_inv = view.inverse();
        self.recompute_view_proj();
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        self.projection_inv = projection.inverse();
        self.recompute_view_proj();
    }

    fn recompute_view_proj(&mut self) {
        self.view_proj = self.projection * self.view;
        self.view_proj_inv = self.view_proj.inverse();
        self.frustum = Frustum::from_view_projection(&self.view_proj);
    }

    /// Refreshes the camera's positioning sphere from its owning node's
    /// final matrix. Run once per frame, after `Tree::update_root_recursive`
    /// and before `Octree::mark_visibles`.
    pub fn update_from_node(&mut self, tree: &Tree) {
        if let Some(node) = tree.node(self.node) {
            self.sphere.center = node.final_matrix().pos;
        }
    }

    pub fn position(&self, tree: &Tree) -> Vec3 {
        tree.node(self.node).map(|n| n.final_matrix().pos).unwrap_or(Vec3::ZERO)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
