//! Hierarchical spatial index of octree-elements, each holding a bounding
//! sphere. Supports loose-octree insertion, re-insertion on movement, and
//! frustum visibility marking.

mod element;
mod tree;

pub use element::{ElementId, OctreeElement};
pub use tree::{InsertionStrategy, NodeId, Octree};
