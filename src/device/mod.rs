//! The opaque GPU collaborator: a device-agnostic trait the buffer
//! broker and vertex/index array pipeline bind against. The engine never
//! assumes a concrete backend; tests and tools run against [`MockDevice`].

mod mock;

pub use mock::{DrawCall, MockDevice};

use crate::error::Result;

/// Opaque handle to a GPU-resident buffer.
pub type DeviceBufferHandle = u32;
/// Opaque handle to a vertex-array object.
pub type VertexArrayHandle = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    StaticDraw,
    StreamDraw,
    DynamicDraw,
    StaticCopy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Read,
    Write,
    ReadWrite,
}

bitflags::bitflags! {
    /// Flags accepted by `map_buffer_range`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MapRangeFlags: u32 {
        const FLUSH_EXPLICIT = 1 << 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    F32,
    U16,
    U32,
    U8,
}

impl ScalarType {
    pub fn size_bytes(self) -> u64 {
        match self {
            ScalarType::F32 | ScalarType::U32 => 4,
            ScalarType::U16 => 2,
            ScalarType::U8 => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    pub fn size_bytes(self) -> u64 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Points,
    Lines,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Vertex attribute kinds. `Tangent`/`Binormal` are
/// aliases for `TexCoord(1)`/`TexCoord(2)` at the wire level but kept as
/// distinct, explicit variants here so callers don't have to remember the
/// aliasing — `AttributeKind::wire_slot` collapses them back down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Color,
    Normal,
    TexCoord(u8),
    Generic(u8),
}

impl AttributeKind {
    pub const TANGENT: AttributeKind = AttributeKind::TexCoord(1);
    pub const BINORMAL: AttributeKind = AttributeKind::TexCoord(2);

    /// The attribute slot index this kind binds to on the device, after
    /// collapsing the `Tangent`/`Binormal` aliases into their texcoord slot.
    pub fn wire_slot(self) -> u32 {
        match self {
            AttributeKind::Position => 0,
            AttributeKind::Color => 1,
            AttributeKind::Normal => 2,
            AttributeKind::TexCoord(n) => 3 + n as u32,
            AttributeKind::Generic(n) => 11 + n as u32,
        }
    }
}

/// The opaque GPU collaborator. Implementors own device-resident storage
/// keyed by [`DeviceBufferHandle`]; the scene core never reaches past this
/// trait into a concrete backend.
pub trait Device: Send + Sync + std::any::Any {
    /// Enables downcasting a `dyn Device` back to a concrete backend (tests
    /// inspecting [`MockDevice`] state; a real backend querying its own
    /// extension data).
    fn as_any(&self) -> &dyn std::any::Any;

    fn create_buffer(&mut self) -> Result<DeviceBufferHandle>;

    fn bind_buffer(&mut self, target: BufferTarget, handle: DeviceBufferHandle);

    /// Allocates (or reallocates) GPU storage for `handle` of `size` bytes
    /// and uploads `data` if present.
    fn buffer_data(
        &mut self,
        handle: DeviceBufferHandle,
        target: BufferTarget,
        size: u64,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()>;

    fn buffer_sub_data(
        &mut self,
        handle: DeviceBufferHandle,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<()>;

    /// Maps the whole buffer. The returned slice is valid for `size` bytes
    /// of GPU storage until the matching [`Device::unmap_buffer`].
    fn map_buffer(
        &mut self,
        handle: DeviceBufferHandle,
        target: BufferTarget,
        mode: MapMode,
    ) -> Result<&mut [u8]>;

    fn map_buffer_range(
        &mut self,
        handle: DeviceBufferHandle,
        target: BufferTarget,
        offset: u64,
        length: u64,
        flags: MapRangeFlags,
    ) -> Result<&mut [u8]>;

    fn flush_mapped_range(
        &mut self,
        handle: DeviceBufferHandle,
        target: BufferTarget,
        offset: u64,
        length: u64,
    ) -> Result<()>;

    fn unmap_buffer(&mut self, handle: DeviceBufferHandle, target: BufferTarget) -> Result<()>;

    fn create_vertex_array_object(&mut self) -> Result<VertexArrayHandle>;
    fn bind_vertex_array(&mut self, id: VertexArrayHandle) -> Result<()>;

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: u32,
        scalar: ScalarType,
        normalized: bool,
        stride: u32,
        offset: u64,
    );
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn disable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib4fv(&mut self, index: u32, value: [f32; 4]);

    fn draw_arrays(&mut self, prim: PrimitiveType, first: u32, count: u32);
    fn draw_elements(&mut self, prim: PrimitiveType, count: u32, index_type: IndexType, offset: u64);
    fn draw_arrays_instanced(&mut self, prim: PrimitiveType, first: u32, count: u32, instances: u32);
    fn draw_elements_instanced(
        &mut self,
        prim: PrimitiveType,
        count: u32,
        index_type: IndexType,
        offset: u64,
        instances: u32,
    );
}
