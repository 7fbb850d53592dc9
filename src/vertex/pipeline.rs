use super::array::{ArraySource, IndexArray, VertexArray};
use crate::device::{Device, IndexType, PrimitiveType, VertexArrayHandle};
use crate::error::Result;
use crate::{engine_bail, engine_err};

/// Tracks which vertex-attribute slots `UseVertexArray` has enabled this
/// frame so `FinishVertexArrayRender` can disable exactly those slots
/// — the intrusive "enabled slots" list, expressed as a plain `Vec`
/// since enabling is idempotent and slots are cheap to compare.
#[derive(Default)]
pub struct VertexArrayPipeline {
    enabled: Vec<u32>,
}

impl VertexArrayPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the device vertex-attribute slot for `va` and points it at
    /// its CPU pointer or buffer offset. `segment_first` is the owning
    /// segment's absolute offset (the caller resolves it via
    /// [`crate::buffer::BufferBroker::segment`] before calling in, so the
    /// pipeline itself never needs to borrow the broker).
    pub fn use_vertex_array(
        &mut self,
        device: &mut dyn Device,
        va: &VertexArray,
        segment_first: Option<u64>,
    ) -> Result<()> {
        let slot = va.kind.wire_slot();
        let offset = match &va.source {
            ArraySource::Buffer { offset, .. } => {
                let first = segment_first
                    .ok_or_else(|| engine_err!(Precondition, "vertex array segment is detached"))?;
                first + offset
            }
            ArraySource::Immediate(_) => 0,
        };
        device.vertex_attrib_pointer(slot, va.component_count, va.scalar, false, va.stride, offset);
        device.enable_vertex_attrib_array(slot);
        if !self.enabled.contains(&slot) {
            self.enabled.push(slot);
        }
        Ok(())
    }

    /// Disables every slot enabled by `use_vertex_array` since the pipeline
    /// was created or last finished.
    pub fn finish_vertex_array_render(&mut self, device: &mut dyn Device) {
        for slot in self.enabled.drain(..) {
            device.disable_vertex_attrib_array(slot);
        }
    }
}

/// A recorded VAO setup sequence: `CallVertexArraySequence` replays it in
/// O(1) by simply rebinding the vertex-array object.
#[derive(Debug, Clone, Copy)]
pub struct VertexArraySequence(VertexArrayHandle);

impl VertexArraySequence {
    /// `BeginVertexArraySequence`: creates a fresh VAO and binds it so
    /// subsequent `UseVertexArray` calls record into it.
    pub fn begin(device: &mut dyn Device) -> Result<Self> {
        let handle = device
            .create_vertex_array_object()
            .map_err(|e| engine_err!(Backend, "vertex array object creation failed: {e}"))?;
        device
            .bind_vertex_array(handle)
            .map_err(|e| engine_err!(Backend, "failed to bind vertex array object: {e}"))?;
        Ok(VertexArraySequence(handle))
    }

    /// `EndVertexArraySequence`: stops recording, returning the handle for
    /// later replay.
    pub fn end(self) -> VertexArrayHandle {
        self.0
    }

    pub fn handle(&self) -> VertexArrayHandle {
        self.0
    }
}

/// `CallVertexArraySequence`: replays a previously recorded VAO in O(1).
pub fn call_vertex_array_sequence(device: &mut dyn Device, handle: VertexArrayHandle) -> Result<()> {
    device
        .bind_vertex_array(handle)
        .map_err(|e| engine_err!(Backend, "failed to bind vertex array object: {e}"))
}

pub fn render(device: &mut dyn Device, prim: PrimitiveType, n_vertices: u32) {
    device.draw_arrays(prim, 0, n_vertices);
}

pub fn render_instanced(device: &mut dyn Device, prim: PrimitiveType, n_vertices: u32, n_instances: u32) {
    device.draw_arrays_instanced(prim, 0, n_vertices, n_instances);
}

pub fn render_indexed(device: &mut dyn Device, prim: PrimitiveType, ia: &IndexArray, n_indices: u32) -> Result<()> {
    if n_indices > ia.count {
        engine_bail!(Precondition, "render_indexed requested more indices than the array holds");
    }
    let offset = match &ia.source {
        ArraySource::Buffer { offset, .. } => *offset,
        ArraySource::Immediate(_) => 0,
    };
    device.draw_elements(prim, n_indices, ia.index_type, offset);
    Ok(())
}

pub fn render_indexed_instanced(
    device: &mut dyn Device,
    prim: PrimitiveType,
    ia: &IndexArray,
    n_indices: u32,
    n_instances: u32,
) -> Result<()> {
    if n_indices > ia.count {
        engine_bail!(Precondition, "render_indexed_instanced requested more indices than the array holds");
    }
    let offset = match &ia.source {
        ArraySource::Buffer { offset, .. } => *offset,
        ArraySource::Immediate(_) => 0,
    };
    device.draw_elements_instanced(prim, n_indices, ia.index_type, offset, n_instances);
    Ok(())
}

pub const DEFAULT_INDEX_TYPE: IndexType = IndexType::U16;

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
