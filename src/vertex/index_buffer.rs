use crate::buffer::{BufferBroker, BufferId, SegmentId};
use crate::device::IndexType;

/// Owns a [`crate::buffer::Buffer`] plus one segment and index-type
/// metadata.
pub struct IndexBuffer {
    pub buffer: BufferId,
    pub segment: SegmentId,
    pub index_type: IndexType,
    pub count: u32,
}

impl IndexBuffer {
    pub fn new(buffer: BufferId, segment: SegmentId, index_type: IndexType, count: u32) -> Self {
        IndexBuffer { buffer, segment, index_type, count }
    }

    pub fn to_index_array(&self, broker: &BufferBroker) -> Option<super::array::IndexArray> {
        let seg = broker.segment(self.segment)?;
        let offset = seg.first()?;
        Some(super::array::IndexArray {
            index_type: self.index_type,
            source: super::array::ArraySource::Buffer { segment: self.segment, offset },
            count: self.count,
        })
    }
}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
