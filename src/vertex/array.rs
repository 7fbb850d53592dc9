use crate::buffer::SegmentId;
use crate::device::{AttributeKind, ScalarType};

/// Where a [`VertexArray`]'s bytes live: an owned CPU-side copy (immediate
/// mode) or an offset into a buffer segment (buffer mode).
#[derive(Debug, Clone)]
pub enum ArraySource {
    Immediate(std::sync::Arc<[u8]>),
    Buffer { segment: SegmentId, offset: u64 },
}

/// Pairs a `(kind, type, stride, component count)` descriptor with a source.
#[derive(Debug, Clone)]
pub struct VertexArray {
    pub kind: AttributeKind,
    pub scalar: ScalarType,
    pub component_count: u32,
    pub stride: u32,
    pub source: ArraySource,
}

impl VertexArray {
    pub fn new_buffer(
        kind: AttributeKind,
        scalar: ScalarType,
        component_count: u32,
        stride: u32,
        segment: SegmentId,
        offset: u64,
    ) -> Self {
        VertexArray { kind, scalar, component_count, stride, source: ArraySource::Buffer { segment, offset } }
    }

    pub fn new_immediate(
        kind: AttributeKind,
        scalar: ScalarType,
        component_count: u32,
        stride: u32,
        data: std::sync::Arc<[u8]>,
    ) -> Self {
        VertexArray { kind, scalar, component_count, stride, source: ArraySource::Immediate(data) }
    }
}

/// A separate `(type, pointer/offset)` pair describing the index stream of
/// an indexed draw.
#[derive(Debug, Clone)]
pub struct IndexArray {
    pub index_type: crate::device::IndexType,
    pub source: ArraySource,
    pub count: u32,
}

#[cfg(test)]
#[path = "array_tests.rs"]
mod tests;
