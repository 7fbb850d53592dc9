use super::buffer::{Buffer, BufferId, UpdatePolicy};
use super::segment::{BufferSegment, SegmentId};
use crate::device::{BufferTarget, BufferUsage, Device, MapMode, MapRangeFlags};
use crate::error::Result;
use crate::{engine_bail, engine_err};
use slotmap::SlotMap;

/// Owns every [`Buffer`] and [`BufferSegment`] and the global
/// "modified buffers" registry. All buffer-broker operations go through
/// this value; it is the explicit, lexically-scoped replacement for
/// module-level globals.
pub struct BufferBroker {
    buffers: SlotMap<BufferId, Buffer>,
    segments: SlotMap<SegmentId, BufferSegment>,
    modified_buffers: Vec<BufferId>,
    device: Box<dyn Device>,
}

impl BufferBroker {
    pub fn new(device: Box<dyn Device>) -> Self {
        BufferBroker {
            buffers: SlotMap::with_key(),
            segments: SlotMap::with_key(),
            modified_buffers: Vec::new(),
            device,
        }
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }

    /// Downcasts the broker's device to a concrete backend type, e.g. tests
    /// inspecting [`crate::device::MockDevice`] storage.
    pub fn device_as<D: Device + 'static>(&self) -> Option<&D> {
        self.device.as_any().downcast_ref::<D>()
    }

    pub fn create_buffer(&mut self, target: BufferTarget, usage: BufferUsage) -> BufferId {
        self.create_buffer_with_policy(target, usage, UpdatePolicy::RangeMap)
    }

    pub fn create_buffer_with_policy(
        &mut self,
        target: BufferTarget,
        usage: BufferUsage,
        policy: UpdatePolicy,
    ) -> BufferId {
        self.buffers.insert(Buffer::new(target, usage, policy))
    }

    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&BufferSegment> {
        self.segments.get(id)
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut BufferSegment> {
        self.segments.get_mut(id)
    }

    /// `AddBufferNewData`: allocates a fresh owned segment and appends it.
    pub fn add_buffer_new_data(&mut self, buffer: BufferId, data: Vec<u8>) -> Result<SegmentId> {
        let seg_id = self.segments.insert(BufferSegment::owned(data));
        self.add_buffer_data(buffer, seg_id)?;
        Ok(seg_id)
    }

    /// `AddBufferData`: appends a (detached) segment to `buffer`, assigning
    /// `seg.first` and growing `buffer.size`.
    pub fn add_buffer_data(&mut self, buffer: BufferId, seg_id: SegmentId) -> Result<()> {
        let already_owned = self
            .segments
            .get(seg_id)
            .ok_or_else(|| engine_err!(Precondition, "unknown segment"))?
            .owning_buffer();
        if already_owned.is_some() {
            engine_bail!(Precondition, "segment already belongs to a buffer");
        }

        let buf = self
            .buffers
            .get_mut(buffer)
            .ok_or_else(|| engine_err!(Precondition, "unknown buffer"))?;
        let seg = self.segments.get_mut(seg_id).expect("checked above");

        seg.first = Some(buf.size);
        seg.buffer = Some(buffer);
        buf.size += seg.size();
        buf.segments.push(seg_id);
        Ok(())
    }

    /// `RemoveBufferData`: unlinks the segment without compacting the
    /// buffer's size — the caller must never reuse its old offset.
    pub fn remove_buffer_data(&mut self, seg_id: SegmentId) -> Result<()> {
        let seg = self
            .segments
            .get_mut(seg_id)
            .ok_or_else(|| engine_err!(Precondition, "unknown segment"))?;
        let Some(buffer_id) = seg.buffer.take() else {
            return Ok(());
        };
        seg.first = None;
        seg.clear_modified();

        if let Some(buf) = self.buffers.get_mut(buffer_id) {
            buf.segments.retain(|s| *s != seg_id);
            buf.modified_segments.retain(|s| *s != seg_id);
        }
        Ok(())
    }

    /// `Build`: allocates GPU storage, uploads every segment's current
    /// bytes, and resets the buffer's modified range.
    pub fn build(&mut self, buffer_id: BufferId) -> Result<()> {
        let buf = self
            .buffers
            .get(buffer_id)
            .ok_or_else(|| engine_err!(Precondition, "unknown buffer"))?;
        let target = buf.target;
        let usage = buf.usage;
        let size = buf.size;
        let segment_ids = buf.segments.clone();

        let handle = match self.buffers.get(buffer_id).and_then(|b| b.handle) {
            Some(h) => h,
            None => self
                .device
                .create_buffer()
                .map_err(|e| engine_err!(Backend, "failed to create device buffer: {e}"))?,
        };

        let mut staging = vec![0u8; size as usize];
        for seg_id in &segment_ids {
            let seg = &self.segments[*seg_id];
            let first = seg.first().expect("segment is attached") as usize;
            let bytes = seg.data();
            staging[first..first + bytes.len()].copy_from_slice(bytes);
        }

        self.device
            .buffer_data(handle, target, size, Some(&staging), usage)
            .map_err(|e| engine_err!(Backend, "buffer upload failed: {e}"))?;

        let buf = self.buffers.get_mut(buffer_id).expect("checked above");
        buf.handle = Some(handle);
        buf.built = true;
        buf.range = None;
        Ok(())
    }

    /// `ModifiedBuffer`: unions `range` (or the whole buffer) into the
    /// buffer's dirty range and registers it globally.
    pub fn modified_buffer(&mut self, buffer_id: BufferId, range: Option<(u64, u64)>) -> Result<()> {
        let buf = self
            .buffers
            .get_mut(buffer_id)
            .ok_or_else(|| engine_err!(Precondition, "unknown buffer"))?;
        buf.union_range(range);
        if !self.modified_buffers.contains(&buffer_id) {
            self.modified_buffers.push(buffer_id);
        }
        Ok(())
    }

    /// `ModifiedBufferData`: marks `seg` modified, unions `range` inside the
    /// segment, then propagates the absolute translated range to the
    /// owning buffer and the global modified-buffers registry.
    pub fn modified_buffer_data(&mut self, seg_id: SegmentId, range: Option<(u64, u64)>) -> Result<()> {
        let seg = self
            .segments
            .get_mut(seg_id)
            .ok_or_else(|| engine_err!(Precondition, "unknown segment"))?;
        let buffer_id = seg
            .owning_buffer()
            .ok_or_else(|| engine_err!(Precondition, "segment is detached"))?;
        seg.mark_modified(range);
        let absolute = seg.absolute_modified_range();

        if let Some(buf) = self.buffers.get_mut(buffer_id) {
            if !buf.modified_segments.contains(&seg_id) {
                buf.modified_segments.push(seg_id);
            }
        }
        self.modified_buffer(buffer_id, absolute)
    }

    /// `UpdateModifiedBuffers`: updates every globally-registered buffer
    /// and flushes the registry.
    pub fn update_modified_buffers(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.modified_buffers);
        for buffer_id in pending {
            if let Err(e) = self.update_buffer(buffer_id) {
                crate::engine_warn!("scengine::buffer", "skipping buffer update: {e}");
            }
        }
        Ok(())
    }

    /// `UpdateBuffer`: re-uploads every modified segment via the buffer's
    /// chosen mapping strategy, clears `modified` flags, and resets the
    /// buffer's dirty range. Mapping failures are logged and the update is
    /// skipped for that buffer.
    pub fn update_buffer(&mut self, buffer_id: BufferId) -> Result<()> {
        let Some(buf) = self.buffers.get(buffer_id) else {
            return Ok(());
        };
        if !buf.built || buf.modified_segments.is_empty() {
            return Ok(());
        }
        let Some(handle) = buf.handle else {
            engine_bail!(Precondition, "update_buffer called on an un-built buffer");
        };
        let target = buf.target;
        let policy = buf.update_policy;
        let modified: Vec<SegmentId> = buf.modified_segments.clone();
        let buffer_range = buf.range;

        match policy {
            UpdatePolicy::ClassicMap => {
                let mapped = self
                    .device
                    .map_buffer(handle, target, MapMode::Write)
                    .map_err(|e| engine_err!(Backend, "map_buffer failed: {e}"))?;
                for seg_id in &modified {
                    let seg = &self.segments[*seg_id];
                    if let Some((lo, hi)) = seg.modified_range() {
                        let first = seg.first().expect("attached") as usize;
                        let dst = first + lo as usize..first + hi as usize;
                        mapped[dst].copy_from_slice(&seg.data()[lo as usize..hi as usize]);
                    }
                }
                self.device
                    .unmap_buffer(handle, target)
                    .map_err(|e| engine_err!(Backend, "unmap_buffer failed: {e}"))?;
            }
            UpdatePolicy::RangeMap => {
                let Some((lo, hi)) = buffer_range else {
                    return Ok(());
                };
                let mapped = self
                    .device
                    .map_buffer_range(handle, target, lo, hi - lo, MapRangeFlags::FLUSH_EXPLICIT)
                    .map_err(|e| engine_err!(Backend, "map_buffer_range failed: {e}"))?;
                for seg_id in &modified {
                    let seg = &self.segments[*seg_id];
                    if let (Some((slo, shi)), Some((seg_lo, seg_hi))) =
                        (seg.absolute_modified_range(), seg.modified_range())
                    {
                        let dst = (slo - lo) as usize..(shi - lo) as usize;
                        mapped[dst].copy_from_slice(&seg.data()[seg_lo as usize..seg_hi as usize]);
                    }
                }
                self.device
                    .flush_mapped_range(handle, target, lo, hi - lo)
                    .map_err(|e| engine_err!(Backend, "flush_mapped_range failed: {e}"))?;
                self.device
                    .unmap_buffer(handle, target)
                    .map_err(|e| engine_err!(Backend, "unmap_buffer failed: {e}"))?;
            }
        }

        for seg_id in &modified {
            self.segments[*seg_id].clear_modified();
        }
        let buf = self.buffers.get_mut(buffer_id).expect("checked above");
        buf.modified_segments.clear();
        buf.range = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "broker_tests.rs"]
mod tests;
