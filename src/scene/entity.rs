use super::instance::{InstanceId, SceneEntityInstance};
use super::instance_group::InstanceGroupId;
use crate::bounds::{BoundingBox, BoundingSphere, Collision, Frustum};
use crate::node::{NodeId, Tree};
use crate::resource::{MaterialResource, SceneResource, ShaderResource, TextureResource};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a [`SceneEntity`] owned by a [`super::Scene`].
    pub struct EntityId;
}

new_key_type! {
    /// Identifies a [`SceneEntityGroup`] owned by a [`super::Scene`].
    pub struct EntityGroupId;
}

bitflags::bitflags! {
    /// The boolean render-state properties of a [`SceneEntity`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntityFlags: u8 {
        const CULL_FACE = 1 << 0;
        const DEPTH_TEST = 1 << 1;
        const ALPHA_TEST = 1 << 2;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        EntityFlags::CULL_FACE | EntityFlags::DEPTH_TEST
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    Less,
    LessEqual,
    Equal,
    Always,
}

/// One LOD level of a renderable bundle: the geometry-instance group it
/// draws through, resolved textures/shader/material resources, bounds used
/// by culling and LOD selection, and render-state flags.
pub struct SceneEntity {
    pub instance_group: InstanceGroupId,
    pub bounding_box: BoundingBox,
    pub bounding_sphere: BoundingSphere,
    pub textures: Vec<SceneResource<TextureResource>>,
    pub shader: Option<SceneResource<ShaderResource>>,
    pub material: Option<SceneResource<MaterialResource>>,
    pub flags: EntityFlags,
    pub cull_mode: CullMode,
    pub depth_mode: DepthMode,
    group: Option<EntityGroupId>,
}

impl SceneEntity {
    pub fn new(instance_group: InstanceGroupId, bounding_box: BoundingBox, bounding_sphere: BoundingSphere) -> Self {
        SceneEntity {
            instance_group,
            bounding_box,
            bounding_sphere,
            textures: Vec::new(),
            shader: None,
            material: None,
            flags: EntityFlags::default(),
            cull_mode: CullMode::Back,
            depth_mode: DepthMode::Less,
            group: None,
        }
    }

    pub fn group(&self) -> Option<EntityGroupId> {
        self.group
    }

    pub(crate) fn set_group(&mut self, group: EntityGroupId) {
        self.group = Some(group);
    }

    /// `IsInFrustum` predicate for an instance riding on `node`: pushes the
    /// entity's local bounding sphere through the node's final matrix and
    /// classifies it against `frustum`.
    pub fn in_frustum(&self, tree: &Tree, node: NodeId, frustum: &Frustum) -> Collision {
        let Some(n) = tree.node(node) else {
            return Collision::Out;
        };
        let mut sphere = self.bounding_sphere;
        sphere.push(n.final_matrix());
        let result = frustum.classify_sphere(&sphere);
        sphere.pop();
        result
    }
}

/// Ties together one logical object's LOD ladder (ordered, index 0 = most
/// detailed) and the shared list of [`SceneEntityInstance`]s rendered
/// through it.
pub struct SceneEntityGroup {
    entities: Vec<EntityId>,
    instances: SlotMap<InstanceId, SceneEntityInstance>,
    selected: Vec<InstanceId>,
}

impl SceneEntityGroup {
    pub fn new() -> Self {
        SceneEntityGroup { entities: Vec::new(), instances: SlotMap::with_key(), selected: Vec::new() }
    }

    pub fn push_lod(&mut self, entity: EntityId) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn add_instance(&mut self, instance: SceneEntityInstance) -> InstanceId {
        self.instances.insert(instance)
    }

    /// Marks `id` removed and drops it from storage. The octree element and
    /// node are the caller's responsibility to unwind first (they may be
    /// shared with other scene structures the group doesn't own).
    pub fn remove_instance(&mut self, id: InstanceId) -> Option<SceneEntityInstance> {
        self.selected.retain(|i| *i != id);
        self.instances.remove(id)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&SceneEntityInstance> {
        self.instances.get(id)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut SceneEntityInstance> {
        self.instances.get_mut(id)
    }

    pub fn instances(&self) -> impl Iterator<Item = (InstanceId, &SceneEntityInstance)> {
        self.instances.iter()
    }

    pub fn instance_ids(&self) -> Vec<InstanceId> {
        self.instances.keys().collect()
    }

    pub fn selected(&self) -> &[InstanceId] {
        &self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: Vec<InstanceId>) {
        self.selected = selected;
    }
}

impl Default for SceneEntityGroup {
    fn default() -> Self {
        SceneEntityGroup::new()
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
