use super::entity::EntityGroupId;
use super::instance::InstanceId;

/// A thin wrapper around a [`super::SceneEntityInstance`] whose node the
/// scene orchestrator re-centers on the camera every frame and renders with
/// culling, depth-test, and lighting disabled.
///
/// Carries no geometry of its own — it just names the instance (already
/// created through the normal [`super::Scene::add_instance`] path) that
/// plays this role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skybox {
    pub group: EntityGroupId,
    pub instance: InstanceId,
}

impl Skybox {
    pub fn new(group: EntityGroupId, instance: InstanceId) -> Self {
        Skybox { group, instance }
    }
}

#[cfg(test)]
#[path = "skybox_tests.rs"]
mod tests;
