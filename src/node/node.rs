use super::group::NodeGroup;
use crate::math::Mat4x3;
use crate::octree::ElementId;
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a [`Node`] owned by a [`super::Tree`].
    pub struct NodeId;
}

bitflags::bitflags! {
    /// A node's dirty marks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Marks: u8 {
        /// Set by [`super::Tree::has_moved`]; cleared once the node's
        /// subtree has been recomposed.
        const HAS_MOVED = 1 << 0;
        /// Forces recomposition of a subtree even with no moved mark.
        const FORCE = 1 << 1;
    }
}

/// `Single` nodes have no concept of ancestry (their read matrix *is* their
/// final matrix); `Tree` nodes compose with their parent's final matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Single,
    Tree,
}

/// Invoked after a node's final matrix is recomposed, with the node's id
/// and arbitrary user data.
pub type MovedCallback = Box<dyn FnMut(NodeId, &Mat4x3) + Send>;

/// One node in the transform hierarchy: local read/write matrices (double-
/// buffered via the tree's shared [`super::NodeGroup`]), a derived final
/// matrix for `Tree`-kind nodes, parent/child links, and an owned
/// [`crate::octree::OctreeElement`] indexing the node's area of influence.
///
/// Invariant: a node is in exactly one of `parent.children`,
/// `parent.to_update`, or detached (enforced by [`super::Tree`]).
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) to_update: Vec<NodeId>,
    pub(crate) slots: Vec<Mat4x3>,
    pub(crate) final_matrix: Mat4x3,
    pub(crate) marks: Marks,
    pub(crate) octree_element: Option<ElementId>,
    pub(crate) moved: Option<MovedCallback>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, n_slots: usize) -> Self {
        Node {
            kind,
            parent: None,
            children: Vec::new(),
            to_update: Vec::new(),
            slots: vec![Mat4x3::IDENTITY; n_slots],
            final_matrix: Mat4x3::IDENTITY,
            marks: Marks::empty(),
            octree_element: None,
            moved: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn final_matrix(&self) -> &Mat4x3 {
        &self.final_matrix
    }

    /// The group's "read" slot — what parents and renderers consume.
    pub fn read_matrix(&self, group: &NodeGroup) -> &Mat4x3 {
        &self.slots[group.read_slot()]
    }

    /// The group's "write" slot — where callers stage the next frame's
    /// local transform before flipping `group`.
    pub fn write_matrix(&self, group: &NodeGroup) -> &Mat4x3 {
        &self.slots[group.write_slot()]
    }

    pub fn write_matrix_mut(&mut self, group: &NodeGroup) -> &mut Mat4x3 {
        &mut self.slots[group.write_slot()]
    }

    pub fn has_moved(&self) -> bool {
        self.marks.contains(Marks::HAS_MOVED)
    }

    pub fn is_forced(&self) -> bool {
        self.marks.contains(Marks::FORCE)
    }

    pub fn octree_element(&self) -> Option<ElementId> {
        self.octree_element
    }

    pub(crate) fn set_octree_element(&mut self, id: ElementId) {
        self.octree_element = Some(id);
    }

    pub fn set_moved_callback(&mut self, cb: MovedCallback) {
        self.moved = Some(cb);
    }
}
