use crate::device::{Device, PrimitiveType};
use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Mat4;
use crate::math::Mat4x3;
use crate::engine_trace;
use crate::vertex::{render, render_indexed};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`GeometryInstanceGroup`] owned by a [`super::Scene`].
    pub struct InstanceGroupId;
}

/// The three per-call instancing strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstancingKind {
    /// Push the model matrix, draw, pop — once per instance.
    Simple,
    /// Load the modelview once; ship `modelview * model`'s three rows via
    /// vertex attributes `a1,a2,a3`, then draw — once per instance.
    Pseudo,
    /// One draw-instanced call over all selected instances, via the
    /// device's `draw_*_instanced` entry points.
    Hardware,
}

/// A final model matrix plus opaque per-instance user data, gathered at
/// render time from the currently-selected [`super::SceneEntityInstance`]s
/// — what the render loop actually needs per draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryInstance {
    pub model: Mat4x3,
    pub user_data: u32,
}

/// A shared geometry plus the list of per-instance matrices to draw it
/// with, an instancing strategy, and the three vertex attribute indices
/// `pseudo` mode ships a 3×4 row-major matrix through.
pub struct GeometryInstanceGroup {
    pub geometry: Geometry,
    instances: Vec<GeometryInstance>,
    pub kind: InstancingKind,
    pub attrib_indices: [u32; 3],
}

impl GeometryInstanceGroup {
    pub fn new(geometry: Geometry, kind: InstancingKind) -> Self {
        GeometryInstanceGroup { geometry, instances: Vec::new(), kind, attrib_indices: [1, 2, 3] }
    }

    pub fn instances(&self) -> &[GeometryInstance] {
        &self.instances
    }

    /// Replaces the draw-time instance list — the scene refreshes this
    /// from each group's currently-selected [`super::SceneEntityInstance`]s
    /// every frame, after culling and LOD selection.
    pub fn set_instances(&mut self, instances: Vec<GeometryInstance>) {
        self.instances = instances;
    }

    /// Draws every instance in `self.instances` under the group's
    /// instancing strategy. `set_model` is invoked with each instance's
    /// model matrix for the `Simple` strategy, where uniform/shader state
    /// binding is an opaque collaborator this crate doesn't define.
    pub fn render(&mut self, device: &mut dyn Device, modelview: &Mat4, mut set_model: impl FnMut(&Mat4x3)) -> Result<()> {
        let prim = self.geometry.primitive();
        let n_verts = self.geometry.vertex_count();
        let index_array = self.geometry.index_array().cloned();

        match self.kind {
            InstancingKind::Simple => {
                for instance in &self.instances {
                    set_model(&instance.model);
                    draw_one(device, prim, n_verts, index_array.as_ref())?;
                }
            }
            InstancingKind::Pseudo => {
                for instance in &self.instances {
                    let final_matrix = Mat4x3 {
                        rot: crate::math::Mat3::from_mat4(*modelview) * instance.model.rot,
                        pos: (*modelview * instance.model.pos.extend(1.0)).truncate(),
                    };
                    for (row, &attrib) in final_matrix.rows().iter().zip(&self.attrib_indices) {
                        device.vertex_attrib4fv(attrib, row.to_array());
                    }
                    draw_one(device, prim, n_verts, index_array.as_ref())?;
                }
            }
            InstancingKind::Hardware => {
                let n_instances = self.instances.len() as u32;
                if n_instances == 0 {
                    return Ok(());
                }
                engine_trace!("scengine::scene", "hardware-instanced draw of {} instances", n_instances);
                match &index_array {
                    Some(ia) => crate::vertex::render_indexed_instanced(device, prim, ia, ia.count, n_instances)?,
                    None => device.draw_arrays_instanced(prim, 0, n_verts, n_instances),
                }
            }
        }
        Ok(())
    }
}

fn draw_one(
    device: &mut dyn Device,
    prim: PrimitiveType,
    n_verts: u32,
    index_array: Option<&crate::vertex::IndexArray>,
) -> Result<()> {
    match index_array {
        Some(ia) => render_indexed(device, prim, ia, ia.count),
        None => {
            render(device, prim, n_verts);
            Ok(())
        }
    }
}

impl std::fmt::Debug for GeometryInstanceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryInstanceGroup")
            .field("kind", &self.kind)
            .field("instances", &self.instances.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "instance_group_tests.rs"]
mod tests;
