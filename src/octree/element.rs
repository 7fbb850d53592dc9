use super::tree::NodeId;
use crate::bounds::BoundingSphere;
use slotmap::new_key_type;

new_key_type! {
    /// Identifies an [`OctreeElement`] owned by an [`super::Octree`].
    pub struct ElementId;
}

/// A sphere-bounded occupant of an [`super::Octree`]. Carries an opaque
/// `owner` payload (the generic parameter `O`) so both [`crate::node::Node`]s
/// (indexing their area of influence) and scene-entity instances (indexed
/// for culling) can share one tree without the octree knowing about either.
///
/// Lifecycle: created free (`node = None`) → inserted (assigned an owning
/// node) → optionally re-inserted on movement → removed before destruction.
pub struct OctreeElement<O> {
    pub(crate) node: Option<NodeId>,
    pub sphere: BoundingSphere,
    pub owner: O,
}

impl<O> OctreeElement<O> {
    pub fn new(sphere: BoundingSphere, owner: O) -> Self {
        OctreeElement { node: None, sphere, owner }
    }

    /// The octree node this element currently lives in, or `None` if it has
    /// not yet been inserted (or has just been removed).
    pub fn owning_node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn is_inserted(&self) -> bool {
        self.node.is_some()
    }
}
