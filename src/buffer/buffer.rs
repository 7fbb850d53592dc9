use super::segment::SegmentId;
use crate::device::{BufferTarget, BufferUsage, DeviceBufferHandle};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`Buffer`] owned by a [`super::BufferBroker`].
    pub struct BufferId;
}

/// `UpdateBuffer`'s two strategies: map the whole buffer and memcpy
/// every modified segment, or map only the unified `[lo,hi]` range with
/// explicit flush. Chosen once at buffer creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    ClassicMap,
    RangeMap,
}

/// GPU handle, target, total size, and the bookkeeping `UpdateModifiedBuffers`
/// needs: an ordered segment list, a modified-segment list, and a unified
/// dirty range.
pub struct Buffer {
    pub(crate) handle: Option<DeviceBufferHandle>,
    pub(crate) target: BufferTarget,
    pub(crate) usage: BufferUsage,
    pub(crate) update_policy: UpdatePolicy,
    pub(crate) size: u64,
    /// Segments in offset order; invariant: contiguous, partitions `[0,size)`.
    pub(crate) segments: Vec<SegmentId>,
    /// Subset of `segments` currently marked modified.
    pub(crate) modified_segments: Vec<SegmentId>,
    pub(crate) range: Option<(u64, u64)>,
    pub(crate) built: bool,
}

impl Buffer {
    pub(crate) fn new(target: BufferTarget, usage: BufferUsage, update_policy: UpdatePolicy) -> Self {
        Buffer {
            handle: None,
            target,
            usage,
            update_policy,
            size: 0,
            segments: Vec::new(),
            modified_segments: Vec::new(),
            range: None,
            built: false,
        }
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn handle(&self) -> Option<DeviceBufferHandle> {
        self.handle
    }

    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn modified_range(&self) -> Option<(u64, u64)> {
        self.range
    }

    pub(crate) fn union_range(&mut self, range: Option<(u64, u64)>) {
        let Some((lo, hi)) = range else {
            self.range = Some((0, self.size));
            return;
        };
        self.range = Some(match self.range {
            Some((olo, ohi)) => (olo.min(lo), ohi.max(hi)),
            None => (lo, hi),
        });
    }
}
