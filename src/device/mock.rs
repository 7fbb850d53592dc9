//! In-process [`Device`] used by tests and tools that don't have a real GPU
//! backend wired up. Buffers are plain `Vec<u8>`s; every operation that a
//! real backend would submit to a queue is instead applied immediately and
//! recorded into a call log so tests can assert on it.

use super::{
    BufferTarget, BufferUsage, Device, DeviceBufferHandle, IndexType, MapMode, MapRangeFlags,
    PrimitiveType, ScalarType, VertexArrayHandle,
};
use crate::engine_bail;
use crate::error::Result;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Arrays { prim: PrimitiveType, first: u32, count: u32 },
    Elements { prim: PrimitiveType, count: u32, index_type: IndexType, offset: u64 },
    ArraysInstanced { prim: PrimitiveType, first: u32, count: u32, instances: u32 },
    ElementsInstanced { prim: PrimitiveType, count: u32, index_type: IndexType, offset: u64, instances: u32 },
}

/// A reference GPU-less [`Device`]. Storage is a `Vec<u8>` per handle;
/// mapping returns a direct borrow into that storage.
#[derive(Default)]
pub struct MockDevice {
    buffers: FxHashMap<DeviceBufferHandle, Vec<u8>>,
    next_handle: DeviceBufferHandle,
    mapped: FxHashMap<DeviceBufferHandle, MapMode>,
    next_vao: VertexArrayHandle,
    pub draw_calls: Vec<DrawCall>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer_bytes(&self, handle: DeviceBufferHandle) -> Option<&[u8]> {
        self.buffers.get(&handle).map(|v| v.as_slice())
    }
}

impl Device for MockDevice {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn create_buffer(&mut self) -> Result<DeviceBufferHandle> {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.buffers.insert(handle, Vec::new());
        Ok(handle)
    }

    fn bind_buffer(&mut self, _target: BufferTarget, _handle: DeviceBufferHandle) {}

    fn buffer_data(
        &mut self,
        handle: DeviceBufferHandle,
        _target: BufferTarget,
        size: u64,
        data: Option<&[u8]>,
        _usage: BufferUsage,
    ) -> Result<()> {
        let storage = self
            .buffers
            .get_mut(&handle)
            .ok_or_else(|| crate::engine_err!(Backend, "unknown buffer handle {handle}"))?;
        *storage = vec![0u8; size as usize];
        if let Some(data) = data {
            storage[..data.len()].copy_from_slice(data);
        }
        Ok(())
    }

    fn buffer_sub_data(
        &mut self,
        handle: DeviceBufferHandle,
        _target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<()> {
        let storage = self
            .buffers
            .get_mut(&handle)
            .ok_or_else(|| crate::engine_err!(Backend, "unknown buffer handle {handle}"))?;
        let start = offset as usize;
        let end = start + data.len();
        if end > storage.len() {
            engine_bail!(Backend, "buffer_sub_data out of range ({end} > {})", storage.len());
        }
        storage[start..end].copy_from_slice(data);
        Ok(())
    }

    fn map_buffer(
        &mut self,
        handle: DeviceBufferHandle,
        _target: BufferTarget,
        mode: MapMode,
    ) -> Result<&mut [u8]> {
        self.mapped.insert(handle, mode);
        self.buffers
            .get_mut(&handle)
            .map(|v| v.as_mut_slice())
            .ok_or_else(|| crate::engine_err!(Backend, "unknown buffer handle {handle}"))
    }

    fn map_buffer_range(
        &mut self,
        handle: DeviceBufferHandle,
        _target: BufferTarget,
        offset: u64,
        length: u64,
        _flags: MapRangeFlags,
    ) -> Result<&mut [u8]> {
        self.mapped.insert(handle, MapMode::ReadWrite);
        let storage = self
            .buffers
            .get_mut(&handle)
            .ok_or_else(|| crate::engine_err!(Backend, "unknown buffer handle {handle}"))?;
        let start = offset as usize;
        let end = start + length as usize;
        if end > storage.len() {
            engine_bail!(Backend, "map_buffer_range out of range ({end} > {})", storage.len());
        }
        Ok(&mut storage[start..end])
    }

    fn flush_mapped_range(
        &mut self,
        _handle: DeviceBufferHandle,
        _target: BufferTarget,
        _offset: u64,
        _length: u64,
    ) -> Result<()> {
        Ok(())
    }

    fn unmap_buffer(&mut self, handle: DeviceBufferHandle, _target: BufferTarget) -> Result<()> {
        self.mapped.remove(&handle);
        Ok(())
    }

    fn create_vertex_array_object(&mut self) -> Result<VertexArrayHandle> {
        self.next_vao += 1;
        Ok(self.next_vao)
    }

    fn bind_vertex_array(&mut self, _id: VertexArrayHandle) -> Result<()> {
        Ok(())
    }

    fn vertex_attrib_pointer(
        &mut self,
        _index: u32,
        _size: u32,
        _scalar: ScalarType,
        _normalized: bool,
        _stride: u32,
        _offset: u64,
    ) {
    }

    fn enable_vertex_attrib_array(&mut self, _index: u32) {}

    fn disable_vertex_attrib_array(&mut self, _index: u32) {}

    fn vertex_attrib4fv(&mut self, _index: u32, _value: [f32; 4]) {}

    fn draw_arrays(&mut self, prim: PrimitiveType, first: u32, count: u32) {
        self.draw_calls.push(DrawCall::Arrays { prim, first, count });
    }

    fn draw_elements(&mut self, prim: PrimitiveType, count: u32, index_type: IndexType, offset: u64) {
        self.draw_calls.push(DrawCall::Elements { prim, count, index_type, offset });
    }

    fn draw_arrays_instanced(&mut self, prim: PrimitiveType, first: u32, count: u32, instances: u32) {
        self.draw_calls.push(DrawCall::ArraysInstanced { prim, first, count, instances });
    }

    fn draw_elements_instanced(
        &mut self,
        prim: PrimitiveType,
        count: u32,
        index_type: IndexType,
        offset: u64,
        instances: u32,
    ) {
        self.draw_calls
            .push(DrawCall::ElementsInstanced { prim, count, index_type, offset, instances });
    }
}
