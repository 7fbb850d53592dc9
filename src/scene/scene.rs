use super::camera::Camera;
use super::entity::{EntityGroupId, EntityId, SceneEntity, SceneEntityGroup};
use super::instance::{determine_instance_lod, is_instance_in_frustum, InstanceId, SceneEntityInstance};
use super::instance_group::{GeometryInstance, GeometryInstanceGroup, InstanceGroupId, InstancingKind};
use super::light::{Light, LightId};
use super::skybox::Skybox;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::device::Device;
use crate::engine::Engine;
use crate::engine_trace;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::{Mat3, Mat4, Mat4x3};
use crate::node::{NodeId, Tree};
use crate::octree::{ElementId, InsertionStrategy, Octree};
use crate::engine_err;
use crate::resource::SceneResourceGroup;
use glam::Vec3;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use std::sync::{Arc, Mutex};

/// Which kind of occupant an octree element tracks: either a plain
/// [`crate::node::Node`] indexing its own area of influence, or a
/// [`SceneEntityInstance`] indexed for frustum culling ("the octree is
/// shared between two occupant kinds").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OctreeOwner {
    Node(NodeId),
    Instance(EntityGroupId, InstanceId),
}

/// One of the six faces of a cube render target, selected when rendering
/// into a cubemap (e.g. a point light's shadow cube, or a reflection
/// probe). Opaque to this crate beyond naming the face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// Where a frame's draw calls land. The backend resolves `Texture` handles;
/// this crate only threads the selector through `update`/`render`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    #[default]
    Screen,
    Texture(u32),
}

bitflags::bitflags! {
    /// The scene-level state flags: whether to clear color/depth
    /// before a frame, whether frustum culling, lighting, and LOD
    /// selection run during `Update`/`Render`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SceneFlags: u8 {
        const CLEAR_COLOR = 1 << 0;
        const CLEAR_DEPTH = 1 << 1;
        const FRUSTUM_CULLING = 1 << 2;
        const LIGHTING = 1 << 3;
        const LOD = 1 << 4;
    }
}

impl Default for SceneFlags {
    fn default() -> Self {
        SceneFlags::CLEAR_COLOR | SceneFlags::CLEAR_DEPTH | SceneFlags::FRUSTUM_CULLING | SceneFlags::LIGHTING | SceneFlags::LOD
    }
}

/// An octree element tracked against the node that positions it: its id
/// plus the untransformed, local-space sphere pushed through the node's
/// final matrix on every reinsertion.
struct TrackedElement {
    element: ElementId,
    local_sphere: BoundingSphere,
}

const MAX_ACTIVE_LIGHTS: usize = 8;

/// Owns the node root, octree, resource groups, entity groups, instance
/// groups, lights, an optional skybox, and orchestrates the per-frame
/// update → cull → LOD → render pipeline.
///
/// The octree holds both nodes' own area-of-influence elements and scene
/// entity instances' culling elements, distinguished by [`OctreeOwner`];
/// elements are kept in sync with node movement via each tracked node's
/// `moved` callback, which pushes the node's id onto a shared dirty list
/// drained at the start of every [`Scene::update`].
pub struct Scene {
    tree: Tree,
    octree: Octree<OctreeOwner>,
    resources: SceneResourceGroup,
    entities: SlotMap<EntityId, SceneEntity>,
    entity_groups: SlotMap<EntityGroupId, SceneEntityGroup>,
    instance_groups: SlotMap<InstanceGroupId, GeometryInstanceGroup>,
    lights: SlotMap<LightId, Light>,
    skybox: Option<Skybox>,
    pub clear_color: Vec3,
    pub clear_depth: f32,
    flags: SceneFlags,
    current_target: RenderTarget,
    current_face: Option<CubeFace>,
    tracked: FxHashMap<NodeId, Vec<TrackedElement>>,
    callback_nodes: FxHashSet<NodeId>,
    dirty_nodes: Arc<Mutex<Vec<NodeId>>>,
}

impl Scene {
    pub fn new(octree_bounds: BoundingBox, strategy: InsertionStrategy) -> Self {
        Scene {
            tree: Tree::new(),
            octree: Octree::new(octree_bounds, strategy),
            resources: SceneResourceGroup::new(),
            entities: SlotMap::with_key(),
            entity_groups: SlotMap::with_key(),
            instance_groups: SlotMap::with_key(),
            lights: SlotMap::with_key(),
            skybox: None,
            clear_color: Vec3::ZERO,
            clear_depth: 1.0,
            flags: SceneFlags::default(),
            current_target: RenderTarget::Screen,
            current_face: None,
            tracked: FxHashMap::default(),
            callback_nodes: FxHashSet::default(),
            dirty_nodes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builds the octree from the process-wide [`crate::EngineConfig`]
    /// defaults: a cube of side `octree_size` centered at the origin,
    /// loose with margin `loose_ratio`.
    pub fn with_default_octree() -> Self {
        let config = Engine::config();
        let size = config.octree_size;
        let bounds = BoundingBox::from_center(Vec3::ZERO, size, size, size);
        Scene::new(bounds, InsertionStrategy::Loose { ratio: config.loose_ratio })
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn octree(&self) -> &Octree<OctreeOwner> {
        &self.octree
    }

    pub fn resources(&self) -> &SceneResourceGroup {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut SceneResourceGroup {
        &mut self.resources
    }

    pub fn flags(&self) -> SceneFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: SceneFlags) {
        self.flags = flags;
    }

    pub fn entity(&self, id: EntityId) -> Option<&SceneEntity> {
        self.entities.get(id)
    }

    pub fn entity_group(&self, id: EntityGroupId) -> Option<&SceneEntityGroup> {
        self.entity_groups.get(id)
    }

    pub fn instance_group(&self, id: InstanceGroupId) -> Option<&GeometryInstanceGroup> {
        self.instance_groups.get(id)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id)
    }

    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    pub fn set_skybox(&mut self, skybox: Skybox) {
        self.skybox = Some(skybox);
    }

    /// Creates a detached-then-parented tree node under `parent`.
    pub fn create_node(&mut self, parent: NodeId) -> Result<NodeId> {
        let id = self.tree.create_node();
        self.tree.set_parent(id, parent)?;
        Ok(id)
    }

    pub fn add_entity(&mut self, entity: SceneEntity) -> EntityId {
        self.entities.insert(entity)
    }

    pub fn create_entity_group(&mut self) -> EntityGroupId {
        self.entity_groups.insert(SceneEntityGroup::new())
    }

    /// Appends `entity` as the next LOD level of `group` (index order is
    /// the LOD ladder, 0 = most detailed).
    pub fn push_lod(&mut self, group: EntityGroupId, entity: EntityId) -> Result<()> {
        if let Some(e) = self.entities.get_mut(entity) {
            e.set_group(group);
        }
        self.entity_groups
            .get_mut(group)
            .ok_or_else(|| engine_err!(Precondition, "unknown entity group"))?
            .push_lod(entity);
        Ok(())
    }

    pub fn create_instance_group(&mut self, geometry: Geometry, kind: InstancingKind) -> InstanceGroupId {
        self.instance_groups.insert(GeometryInstanceGroup::new(geometry, kind))
    }

    /// Registers `node` as tracked by a fresh octree element with the given
    /// local-space `sphere` and `owner`, wiring a `moved` callback (if this
    /// is the node's first tracked element) that reinserts every element
    /// tracking it whenever the node's final matrix changes.
    fn track(&mut self, node: NodeId, local_sphere: BoundingSphere, owner: OctreeOwner) -> ElementId {
        let element = self.octree.insert_new(local_sphere, owner);
        self.tracked.entry(node).or_default().push(TrackedElement { element, local_sphere });
        self.ensure_moved_callback(node);
        element
    }

    fn ensure_moved_callback(&mut self, node: NodeId) {
        if !self.callback_nodes.insert(node) {
            return;
        }
        let dirty = Arc::clone(&self.dirty_nodes);
        if let Some(n) = self.tree.node_mut(node) {
            n.set_moved_callback(Box::new(move |id, _final_matrix| {
                if let Ok(mut guard) = dirty.lock() {
                    guard.push(id);
                }
            }));
        }
    }

    /// Gives `node` its own octree element for spatial indexing of its
    /// area of influence (an owned octree element on every node).
    pub fn track_node(&mut self, node: NodeId, local_sphere: BoundingSphere) -> Result<ElementId> {
        let element = self.track(node, local_sphere, OctreeOwner::Node(node));
        self.tree
            .node_mut(node)
            .ok_or_else(|| engine_err!(Precondition, "unknown node"))?
            .set_octree_element(element);
        Ok(element)
    }

    /// Creates a [`SceneEntityInstance`] riding `node`, inserts its culling
    /// element into the octree, and adds it to `group`'s instance list.
    pub fn add_instance(
        &mut self,
        group: EntityGroupId,
        node: NodeId,
        owns_node: bool,
        local_sphere: BoundingSphere,
    ) -> Result<InstanceId> {
        // The instance id doesn't exist until after insertion, so the
        // element is created with a placeholder owner and corrected below.
        let element = self.octree.insert_new(local_sphere, OctreeOwner::Node(node));
        let mut instance = SceneEntityInstance::new(node, owns_node, element);
        instance.set_group(group);

        let instance_id = self
            .entity_groups
            .get_mut(group)
            .ok_or_else(|| engine_err!(Precondition, "unknown entity group"))?
            .add_instance(instance);

        if let Some(e) = self.octree.element_mut(element) {
            e.owner = OctreeOwner::Instance(group, instance_id);
        }
        self.tracked.entry(node).or_default().push(TrackedElement { element, local_sphere });
        self.ensure_moved_callback(node);
        Ok(instance_id)
    }

    /// Removes an instance from its group and the octree. The caller is
    /// responsible for detaching/destroying `node` if this instance owned
    /// it exclusively (a node may be shared with another "truenode").
    pub fn remove_instance(&mut self, group: EntityGroupId, instance: InstanceId) -> Result<()> {
        let removed = self
            .entity_groups
            .get_mut(group)
            .ok_or_else(|| engine_err!(Precondition, "unknown entity group"))?
            .remove_instance(instance)
            .ok_or_else(|| engine_err!(Precondition, "unknown instance"))?;

        let element = removed.octree_element();
        self.octree.remove(element);
        if let Some(list) = self.tracked.get_mut(&removed.node()) {
            list.retain(|t| t.element != element);
        }
        Ok(())
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.insert(light)
    }

    /// Per-frame update: recomposes the
    /// node tree, refreshes the camera, reinserts every octree element
    /// whose tracked node moved this frame, marks octree visibility, then
    /// culls and LOD-selects every entity group's instances.
    pub fn update(&mut self, camera: &mut Camera, target: RenderTarget, face: Option<CubeFace>) -> Result<()> {
        self.current_target = target;
        self.current_face = face;

        self.tree.update_root_recursive();
        camera.update_from_node(&self.tree);
        self.reinsert_dirty()?;
        self.octree.mark_visibles(camera.frustum());

        let frustum_culling = self.flags.contains(SceneFlags::FRUSTUM_CULLING);
        let lod_enabled = self.flags.contains(SceneFlags::LOD);

        let tree = &self.tree;
        let entities = &self.entities;
        for (_group_id, group) in self.entity_groups.iter_mut() {
            let Some(&lod0_id) = group.entities().first() else { continue };
            let lod0_entity = &entities[lod0_id];
            let lod0_box = lod0_entity.bounding_box;
            let n_lods = group.entities().len();

            let mut selected = Vec::new();
            for id in group.instance_ids() {
                let Some(inst) = group.instance_mut(id) else { continue };
                if inst.removed {
                    continue;
                }
                let in_frustum = if frustum_culling { is_instance_in_frustum(tree, inst, lod0_entity, camera) } else { true };
                inst.selected = in_frustum;
                if !in_frustum {
                    continue;
                }
                if let Some(n) = tree.node(inst.node()) {
                    inst.geometry_instance.model = *n.final_matrix();
                }
                if lod_enabled {
                    determine_instance_lod(tree, inst, n_lods, &lod0_box, camera)?;
                }
                selected.push(id);
            }
            group.set_selected(selected);
        }
        Ok(())
    }

    fn reinsert_dirty(&mut self) -> Result<()> {
        let dirty: Vec<NodeId> = {
            let mut guard = self.dirty_nodes.lock().expect("dirty-node lock poisoned");
            std::mem::take(&mut *guard)
        };
        for node in dirty {
            let Some(tracked) = self.tracked.get(&node) else { continue };
            let Some(final_matrix) = self.tree.node(node).map(|n| *n.final_matrix()) else { continue };
            for t in tracked {
                let mut sphere = t.local_sphere;
                sphere.push(&final_matrix);
                self.octree.reinsert_element(t.element, sphere)?;
            }
        }
        Ok(())
    }

    /// Per-frame render. `target`/`face`
    /// default to whatever the last `update` call set.
    pub fn render(&mut self, device: &mut dyn Device, camera: &Camera, target: Option<RenderTarget>, face: Option<CubeFace>) -> Result<()> {
        let target = target.unwrap_or(self.current_target);
        let face = face.or(self.current_face);
        engine_trace!("scengine::scene", "binding render target {:?} face {:?}", target, face);
        if self.flags.contains(SceneFlags::CLEAR_COLOR) {
            engine_trace!("scengine::scene", "clearing color buffer to {:?}", self.clear_color);
        }
        if self.flags.contains(SceneFlags::CLEAR_DEPTH) {
            engine_trace!("scengine::scene", "clearing depth buffer to {}", self.clear_depth);
        }

        let view = *camera.view_matrix();

        if self.skybox.is_some() {
            self.render_skybox(device, camera, &view)?;
        }

        if self.flags.contains(SceneFlags::LIGHTING) {
            self.feed_lights_to_camera(camera);
        }

        self.render_entities(device, &view)
    }

    fn render_skybox(&mut self, device: &mut dyn Device, camera: &Camera, view: &Mat4) -> Result<()> {
        let Some(skybox) = self.skybox else { return Ok(()) };
        let node = {
            let group = self
                .entity_groups
                .get(skybox.group)
                .ok_or_else(|| engine_err!(Precondition, "skybox entity group missing"))?;
            group
                .instance(skybox.instance)
                .ok_or_else(|| engine_err!(Precondition, "skybox instance missing"))?
                .node()
        };

        let cam_pos = camera.position(&self.tree);
        let slots = self.tree.group().clone();
        if let Some(n) = self.tree.node_mut(node) {
            *n.write_matrix_mut(&slots) = Mat4x3::from_translation(cam_pos);
        }
        self.tree.force(node);
        self.tree.update_root_recursive();
        self.reinsert_dirty()?;

        engine_trace!("scengine::scene", "rendering skybox with culling/depth-test/lighting disabled");

        let final_matrix = self.tree.node(node).map(|n| *n.final_matrix()).unwrap_or(Mat4x3::IDENTITY);
        let (entity_id, mut model) = {
            let group = &self.entity_groups[skybox.group];
            let entity_id = *group
                .entities()
                .first()
                .ok_or_else(|| engine_err!(Precondition, "skybox entity group has no entities"))?;
            let model = group.instance(skybox.instance).map(|i| i.geometry_instance).unwrap_or_default();
            (entity_id, model)
        };
        model.model = final_matrix;

        let instance_group_id = self.entities[entity_id].instance_group;
        if let Some(ig) = self.instance_groups.get_mut(instance_group_id) {
            ig.set_instances(vec![model]);
            ig.render(device, view, |_| {})?;
        }
        Ok(())
    }

    fn feed_lights_to_camera(&mut self, camera: &Camera) {
        let view = *camera.view_matrix();
        let view3 = Mat4x3 { rot: Mat3::from_mat4(view), pos: view.w_axis.truncate() };
        let tree = &self.tree;
        for (_id, light) in self.lights.iter_mut().take(MAX_ACTIVE_LIGHTS) {
            let _view_space = light.view_space_matrix(tree, &view3);
        }
        engine_trace!("scengine::scene", "fed {} active lights to the shader", self.lights.len().min(MAX_ACTIVE_LIGHTS));
    }

    fn render_entities(&mut self, device: &mut dyn Device, view: &Mat4) -> Result<()> {
        let entities = &self.entities;
        let instance_groups = &mut self.instance_groups;
        for (_id, group) in self.entity_groups.iter() {
            for (lod_idx, &entity_id) in group.entities().iter().enumerate() {
                let Some(entity) = entities.get(entity_id) else { continue };
                let geom_instances: Vec<GeometryInstance> = group
                    .selected()
                    .iter()
                    .filter_map(|iid| group.instance(*iid))
                    .filter(|inst| inst.lod.current() == lod_idx)
                    .map(|inst| inst.geometry_instance)
                    .collect();
                if geom_instances.is_empty() {
                    continue;
                }
                engine_trace!(
                    "scengine::scene",
                    "using resources for entity (shader {:?})",
                    entity.shader.as_ref().map(|s| s.name.clone())
                );
                let ig = instance_groups
                    .get_mut(entity.instance_group)
                    .ok_or_else(|| engine_err!(Precondition, "entity references unknown instance group"))?;
                ig.set_instances(geom_instances);
                ig.render(device, view, |_model| {})?;
            }
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Scene::with_default_octree()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
