use super::group::NodeGroup;
use super::node::{Marks, Node, NodeId, NodeKind};
use crate::error::Result;
use crate::{engine_bail, engine_err};
use slotmap::SlotMap;

/// Owns every [`Node`] in a transform hierarchy plus the shared
/// [`NodeGroup`] slot indirection every node's local matrix is double-
/// buffered through.
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    group: NodeGroup,
    root: NodeId,
    updating: bool,
}

impl Tree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Tree, 2));
        Tree { nodes, group: NodeGroup::default(), root, updating: false }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn group(&self) -> &NodeGroup {
        &self.group
    }

    /// `Switch`: rotates the shared read/write slot indirection. Affects
    /// every node bound to this tree's group simultaneously.
    pub fn switch_group(&mut self, a: usize, b: usize) {
        self.group.switch(a, b);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Creates a detached `Tree`-kind node (not yet parented).
    pub fn create_node(&mut self) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Tree, self.group.len()))
    }

    /// Creates a `Single`-kind node: its read matrix *is* its final matrix,
    /// with no ancestor composition.
    pub fn create_single_node(&mut self) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Single, self.group.len()))
    }

    /// Parents `child` under `parent`, unlinking it from any previous
    /// parent first.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<()> {
        if child == parent {
            engine_bail!(Precondition, "a node cannot be its own parent");
        }
        self.detach(child);
        self.nodes
            .get_mut(parent)
            .ok_or_else(|| engine_err!(Precondition, "unknown parent node"))?
            .children
            .push(child);
        self.nodes
            .get_mut(child)
            .ok_or_else(|| engine_err!(Precondition, "unknown child node"))?
            .parent = Some(parent);
        Ok(())
    }

    /// Unlinks `id` from whichever of `parent.children` / `parent.to_update`
    /// it currently lives in, leaving it detached (no parent).
    pub fn detach(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get(id) {
            if let Some(parent) = node.parent {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|c| *c != id);
                    p.to_update.retain(|c| *c != id);
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = None;
        }
    }

    /// `Node_HasMoved`: sets `HAS_MOVED` and relinks the node from its
    /// parent's `children` list into its `to_update` list. Idempotent —
    /// safe to call many times per frame.
    pub fn has_moved(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else { return };
        node.marks.insert(Marks::HAS_MOVED);
        let Some(parent_id) = node.parent else { return };
        let Some(parent) = self.nodes.get_mut(parent_id) else { return };
        if let Some(pos) = parent.children.iter().position(|c| *c == id) {
            let moved = parent.children.remove(pos);
            parent.to_update.push(moved);
        }
    }

    /// `Node_Force`: forces recomposition of `id`'s subtree on the next
    /// update walk even if nothing marked it moved.
    pub fn force(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.marks.insert(Marks::FORCE);
        }
        self.has_moved(id);
    }

    /// `Node_UpdateRootRecursive`: rotates the shared read/write slot table
    /// (`Switch(group, READ, WRITE)`) so this frame's staged writes become
    /// the matrices the walk composes from, then walks `root.to_update`
    /// (recursively), recomposing each visited node's final matrix and
    /// firing its `moved` callback, then splices `to_update` back into
    /// `children`. A guard prevents nested/double invocation within one
    /// frame.
    pub fn update_root_recursive(&mut self) {
        if self.updating {
            return;
        }
        self.updating = true;
        self.group.switch(0, 1);
        self.update_recursive(self.root);
        self.updating = false;
    }

    /// `Node_UpdateRecursive`: a node that is itself marked recomposes and
    /// then cascades unconditionally into every child via
    /// [`Self::force_recursive`], since all of their final matrices now
    /// depend on it. A clean node instead only descends into its own
    /// `to_update` chain — its untouched `children` are left alone rather
    /// than walked every frame, which is what keeps the deferred-update
    /// list an actual optimization instead of a full-tree scan.
    fn update_recursive(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else { return };
        let dirty = node.marks.intersects(Marks::HAS_MOVED | Marks::FORCE);

        if dirty {
            self.recompute_final(id);
            self.nodes[id].marks = Marks::empty();
            let pending = std::mem::take(&mut self.nodes[id].to_update);
            let mut all_children = std::mem::take(&mut self.nodes[id].children);
            all_children.extend(pending);
            for child in &all_children {
                self.force_recursive(*child);
            }
            self.nodes[id].children = all_children;
        } else {
            let pending = std::mem::take(&mut self.nodes[id].to_update);
            for child in &pending {
                self.update_recursive(*child);
            }
            let mut all_children = std::mem::take(&mut self.nodes[id].children);
            all_children.extend(pending);
            self.nodes[id].children = all_children;
        }
    }

    /// `Node_UpdateRecForce`: an ancestor just recomposed, so `id`'s final
    /// matrix depends on it regardless of its own marks — recompose and
    /// cascade into every child unconditionally, clearing marks along the
    /// way.
    fn force_recursive(&mut self, id: NodeId) {
        if self.nodes.get(id).is_none() {
            return;
        }
        self.recompute_final(id);
        self.nodes[id].marks = Marks::empty();
        let pending = std::mem::take(&mut self.nodes[id].to_update);
        let mut all_children = std::mem::take(&mut self.nodes[id].children);
        all_children.extend(pending);
        for child in &all_children {
            self.force_recursive(*child);
        }
        self.nodes[id].children = all_children;
    }

    fn recompute_final(&mut self, id: NodeId) {
        let node = &self.nodes[id];
        let read = *node.read_matrix(&self.group);
        let final_matrix = match (node.kind, node.parent) {
            (NodeKind::Tree, Some(parent)) => {
                let parent_final = self.nodes[parent].final_matrix;
                parent_final.mul(&read)
            }
            _ => read,
        };
        let node = &mut self.nodes[id];
        node.final_matrix = final_matrix;
        if let Some(cb) = node.moved.as_mut() {
            cb(id, &final_matrix);
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
