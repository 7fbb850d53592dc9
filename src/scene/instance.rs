use super::camera::Camera;
use super::entity::{EntityGroupId, SceneEntity};
use super::instance_group::GeometryInstance;
use crate::bounds::BoundingBox;
use crate::math::Mat4x3;
use crate::node::{NodeId, Tree};
use crate::octree::ElementId;
use glam::{Vec2, Vec3};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`SceneEntityInstance`] owned by a [`SceneEntityGroup`].
    pub struct InstanceId;
}

/// The per-instance LOD state: the currently-selected LOD index plus an
/// optional override of the default area→LOD mapping function
/// .
pub struct LevelOfDetail {
    current: usize,
    get_lod: Option<std::sync::Arc<dyn Fn(f32) -> usize + Send + Sync>>,
}

impl LevelOfDetail {
    pub fn new() -> Self {
        LevelOfDetail { current: 0, get_lod: None }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Overrides the default `floor(0.4 / sqrt(area))` mapping.
    pub fn set_get_lod_fn(&mut self, f: impl Fn(f32) -> usize + Send + Sync + 'static) {
        self.get_lod = Some(std::sync::Arc::new(f));
    }

    fn evaluate(&self, area: f32) -> usize {
        match &self.get_lod {
            Some(f) => f(area),
            None => default_get_lod(area),
        }
    }
}

impl Default for LevelOfDetail {
    fn default() -> Self {
        LevelOfDetail::new()
    }
}

/// The default `getLodFn`: `floor(0.4 / sqrt(area))`, clamped so a
/// degenerate (zero-area) projection selects the coarsest LOD rather than
/// dividing by zero.
fn default_get_lod(area: f32) -> usize {
    let area = area.max(1e-6);
    (0.4 / area.sqrt()).floor().max(0.0) as usize
}

/// A `(node, octree-element, LOD-selector, geometry-instance)` tuple bound
/// to one [`SceneEntityGroup`] — the rendered unit.
pub struct SceneEntityInstance {
    node: NodeId,
    owns_node: bool,
    octree_element: ElementId,
    pub geometry_instance: GeometryInstance,
    pub lod: LevelOfDetail,
    pub selected: bool,
    group: Option<EntityGroupId>,
    pub removed: bool,
}

impl SceneEntityInstance {
    pub fn new(node: NodeId, owns_node: bool, octree_element: ElementId) -> Self {
        SceneEntityInstance {
            node,
            owns_node,
            octree_element,
            geometry_instance: GeometryInstance::default(),
            lod: LevelOfDetail::new(),
            selected: false,
            group: None,
            removed: false,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether this instance owns its node exclusively, versus sharing it
    /// with some other "truenode" already in the scene.
    pub fn owns_node(&self) -> bool {
        self.owns_node
    }

    pub fn octree_element(&self) -> ElementId {
        self.octree_element
    }

    pub fn group(&self) -> Option<EntityGroupId> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: EntityGroupId) {
        self.group = Some(group);
    }
}

/// `IsInstanceInFrustum`: transforms `local_sphere` (the owning entity's
/// bounding sphere) through the instance's node and classifies it against
/// the camera's frustum.
pub fn is_instance_in_frustum(tree: &Tree, instance: &SceneEntityInstance, entity: &SceneEntity, camera: &Camera) -> bool {
    let Some(node) = tree.node(instance.node) else {
        return false;
    };
    let mut sphere = entity.bounding_sphere;
    sphere.push(node.final_matrix());
    let result = camera.frustum().intersects_sphere(&sphere);
    sphere.pop();
    result
}

/// Extracts the instance's translation,
/// measures camera distance, projects the lod-0 entity's (rotation-only)
/// bounding box through the camera's projection offset by that distance,
/// and maps the resulting screen-space area to a LOD index via
/// [`LevelOfDetail::evaluate`], capped at `n_lods` (the owning group's
/// entity count).
pub fn determine_instance_lod(
    tree: &Tree,
    instance: &mut SceneEntityInstance,
    n_lods: usize,
    lod0_box: &BoundingBox,
    camera: &Camera,
) -> crate::error::Result<()> {
    let node = tree
        .node(instance.node)
        .ok_or_else(|| crate::engine_err!(Precondition, "instance's node is not in the tree"))?;
    let final_matrix = *node.final_matrix();
    let translation = final_matrix.pos;
    let cam_pos = camera.position(tree);
    let dist = (cam_pos - translation).length();

    // Step 3: undo translation, push the node's rotation onto the box.
    let rot_only = Mat4x3 { rot: final_matrix.rot, pos: Vec3::ZERO };
    let mut box_copy = *lod0_box;
    box_copy.push(&rot_only);

    let proj = camera.projection_matrix();
    let mut min = Vec2::splat(f32::MAX);
    let mut max = Vec2::splat(f32::MIN);
    for p in box_copy.points() {
        let offset = Vec3::new(p.x, p.y, p.z - dist);
        let clip = *proj * offset.extend(1.0);
        if clip.w.abs() > 1e-6 {
            let ndc = Vec2::new(clip.x / clip.w, clip.y / clip.w);
            min = min.min(ndc);
            max = max.max(ndc);
        }
    }
    box_copy.pop();

    let area = ((max.x - min.x) * (max.y - min.y)).abs();
    let n_lods = n_lods.max(1);
    instance.lod.current = instance.lod.evaluate(area).min(n_lods - 1);
    Ok(())
}

#[cfg(test)]
#[path = "instance_tests.rs"]
mod tests;
