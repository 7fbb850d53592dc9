use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`BufferSegment`] owned by a [`super::BufferBroker`].
    pub struct SegmentId;
}

/// CPU-side storage backing a segment. `Owned` data is freed with the
/// segment; `Shared` data is a ref-counted view another owner keeps alive —
/// the `Owned<T>`/`Borrowed<'a, T>` split, expressed
/// without lifetimes via `Arc` so segments can live in a flat slotmap.
#[derive(Debug, Clone)]
pub enum CpuSource {
    Owned(Vec<u8>),
    Shared(std::sync::Arc<[u8]>),
}

impl CpuSource {
    pub fn as_slice(&self) -> &[u8] {
        match self {
            CpuSource::Owned(v) => v.as_slice(),
            CpuSource::Shared(v) => v.as_ref(),
        }
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        match self {
            CpuSource::Owned(v) => Some(v.as_mut_slice()),
            CpuSource::Shared(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named sub-range of a GPU buffer backed by CPU storage: the unit of
/// partial upload.
///
/// Lifecycle: created detached → added to a buffer (`first` assigned,
/// buffer's `size` grows) → optionally marked modified → updated by the
/// buffer's update routine (clears `modified`) → removed (unlinks, storage
/// preserved).
#[derive(Debug, Clone)]
pub struct BufferSegment {
    /// Byte offset within the owning buffer; `None` until added.
    pub(crate) first: Option<u64>,
    pub(crate) buffer: Option<super::BufferId>,
    source: CpuSource,
    modified_range: Option<(u64, u64)>,
    modified: bool,
}

impl BufferSegment {
    pub fn owned(data: Vec<u8>) -> Self {
        BufferSegment {
            first: None,
            buffer: None,
            source: CpuSource::Owned(data),
            modified_range: None,
            modified: false,
        }
    }

    pub fn shared(data: std::sync::Arc<[u8]>) -> Self {
        BufferSegment {
            first: None,
            buffer: None,
            source: CpuSource::Shared(data),
            modified_range: None,
            modified: false,
        }
    }

    pub fn size(&self) -> u64 {
        self.source.len() as u64
    }

    pub fn first(&self) -> Option<u64> {
        self.first
    }

    pub fn owning_buffer(&self) -> Option<super::BufferId> {
        self.buffer
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn modified_range(&self) -> Option<(u64, u64)> {
        self.modified_range
    }

    pub fn data(&self) -> &[u8] {
        self.source.as_slice()
    }

    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.source.as_mut_slice()
    }

    /// Absolute `[first+lo, first+hi)` range inside the owning buffer, or
    /// `None` if unmodified or detached.
    pub fn absolute_modified_range(&self) -> Option<(u64, u64)> {
        let (lo, hi) = self.modified_range?;
        let first = self.first?;
        Some((first + lo, first + hi))
    }

    /// Unions `range` (or the whole segment if `None`) into the segment's
    /// modified range and sets the flag.
    pub(crate) fn mark_modified(&mut self, range: Option<(u64, u64)>) {
        let (lo, hi) = range.unwrap_or((0, self.size()));
        self.modified_range = Some(match self.modified_range {
            Some((olo, ohi)) => (olo.min(lo), ohi.max(hi)),
            None => (lo, hi),
        });
        self.modified = true;
    }

    pub(crate) fn clear_modified(&mut self) {
        self.modified = false;
        self.modified_range = None;
    }
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
