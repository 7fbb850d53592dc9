use super::array::VertexArray;
use super::pipeline::{VertexArrayPipeline, VertexArraySequence};
use crate::buffer::{BufferBroker, BufferId, SegmentId};
use crate::device::{Device, VertexArrayHandle};
use crate::error::Result;
use crate::engine_err;

/// A `BufferSegment` plus the vertex arrays interleaved into it, an
/// optional bound VAO, and the computed stride for the whole chain.
pub struct VertexBufferData {
    pub segment: SegmentId,
    pub arrays: Vec<VertexArray>,
    pub vao: Option<VertexArrayHandle>,
    pub stride: u32,
}

impl VertexBufferData {
    pub fn new(segment: SegmentId, arrays: Vec<VertexArray>) -> Self {
        let stride = arrays.iter().map(|a| a.stride).max().unwrap_or(0);
        VertexBufferData { segment, arrays, vao: None, stride }
    }
}

/// Selects the setup path `VertexBuffer::setup_for_render` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Re-issue `UseVertexArray` for every array, every draw.
    ImmediateArrays,
    /// One VBO bound per segment, attributes re-bound every draw.
    VboPerSegment,
    /// One VAO recorded per segment, replayed thereafter.
    VaoPerSegment,
    /// A single VAO spanning every segment in the buffer.
    UnifiedVao,
}

/// Owns a [`crate::buffer::Buffer`] (by id, in the shared [`BufferBroker`])
/// plus a list of [`VertexBufferData`] and the render mode that selects the
/// device setup path at use time.
pub struct VertexBuffer {
    pub buffer: BufferId,
    pub datas: Vec<VertexBufferData>,
    pub render_mode: RenderMode,
    unified_vao: Option<VertexArrayHandle>,
}

impl VertexBuffer {
    pub fn new(buffer: BufferId, render_mode: RenderMode) -> Self {
        VertexBuffer { buffer, datas: Vec::new(), render_mode, unified_vao: None }
    }

    pub fn add_data(&mut self, data: VertexBufferData) {
        self.datas.push(data);
    }

    /// Prepares the device vertex pipeline for a draw call under this
    /// buffer's render mode, returning the [`VertexArrayPipeline`] used (for
    /// `ImmediateArrays`/`VboPerSegment`, caller must finish it after the
    /// draw; the VAO modes manage their own state and need no finish).
    pub fn setup_for_render(&mut self, broker: &mut BufferBroker) -> Result<Option<VertexArrayPipeline>> {
        let handle = broker
            .buffer(self.buffer)
            .and_then(|b| b.handle())
            .ok_or_else(|| engine_err!(Precondition, "vertex buffer is not built"))?;

        match self.render_mode {
            RenderMode::ImmediateArrays | RenderMode::VboPerSegment => {
                let mut pipeline = VertexArrayPipeline::new();
                for data in &self.datas {
                    let first = broker.segment(data.segment).and_then(|s| s.first());
                    broker.device_mut().bind_buffer(crate::device::BufferTarget::Vertex, handle);
                    for va in &data.arrays {
                        pipeline.use_vertex_array(broker.device_mut(), va, first)?;
                    }
                }
                Ok(Some(pipeline))
            }
            RenderMode::VaoPerSegment => {
                for data in &mut self.datas {
                    let vao = match data.vao {
                        Some(vao) => vao,
                        None => {
                            let first = broker.segment(data.segment).and_then(|s| s.first());
                            let seq = VertexArraySequence::begin(broker.device_mut())?;
                            let mut pipeline = VertexArrayPipeline::new();
                            for va in &data.arrays {
                                pipeline.use_vertex_array(broker.device_mut(), va, first)?;
                            }
                            let vao = seq.end();
                            data.vao = Some(vao);
                            vao
                        }
                    };
                    super::pipeline::call_vertex_array_sequence(broker.device_mut(), vao)?;
                }
                Ok(None)
            }
            RenderMode::UnifiedVao => {
                let vao = match self.unified_vao {
                    Some(vao) => vao,
                    None => {
                        let firsts: Vec<Option<u64>> =
                            self.datas.iter().map(|d| broker.segment(d.segment).and_then(|s| s.first())).collect();
                        let seq = VertexArraySequence::begin(broker.device_mut())?;
                        for (data, first) in self.datas.iter().zip(firsts) {
                            let mut pipeline = VertexArrayPipeline::new();
                            for va in &data.arrays {
                                pipeline.use_vertex_array(broker.device_mut(), va, first)?;
                            }
                        }
                        let vao = seq.end();
                        self.unified_vao = Some(vao);
                        vao
                    }
                };
                super::pipeline::call_vertex_array_sequence(broker.device_mut(), vao)?;
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
