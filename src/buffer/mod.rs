//! GPU buffer broker: a device-agnostic wrapper around GPU-resident
//! byte buffers holding a list of segments with per-segment dirty ranges, a
//! unified dirty range, and a global "modified buffers" registry.

mod broker;
mod buffer;
mod segment;

pub use broker::BufferBroker;
pub use buffer::{Buffer, BufferId, UpdatePolicy};
pub use segment::{BufferSegment, CpuSource, SegmentId};
