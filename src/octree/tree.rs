use super::element::{ElementId, OctreeElement};
use crate::bounds::{BoundingBox, BoundingSphere, Collision, Frustum};
use crate::error::Result;
use crate::{engine_bail, engine_err};
use glam::Vec3;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a node owned by an [`Octree`].
    pub struct NodeId;
}

/// `MakeChildren`'s two insertion behaviors: `Normal` tests a child's exact
/// AABB; `Loose` enlarges every node's AABB by `ratio` (of the node's own
/// size) before testing containment, so elements near a boundary don't
/// thrash between parent and child on small movements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsertionStrategy {
    Normal,
    Loose { ratio: f32 },
}

struct TreeNode {
    bounds: BoundingBox,
    parent: Option<NodeId>,
    children: Option<[NodeId; 8]>,
    elements: Vec<ElementId>,
    visible: bool,
    partially: bool,
}

/// A fixed-bounds spatial partition of octree-elements. Children are
/// created all-at-once by [`Octree::subdivide`]; a node is a leaf until
/// subdivided, after which it holds no elements of its own (they live in
/// the appropriate descendant, or at this node if they straddle a child
/// boundary).
pub struct Octree<O> {
    nodes: SlotMap<NodeId, TreeNode>,
    elements: SlotMap<ElementId, OctreeElement<O>>,
    root: NodeId,
    strategy: InsertionStrategy,
}

/// Corner layout matches [`BoundingBox`]'s canonical 8-point indexing:
/// octant bit 0 = +X half, bit 1 = +Y half, bit 2 = +Z half.
fn octant_box(parent: &BoundingBox, octant: u8) -> BoundingBox {
    let (min, max) = parent.min_max();
    let center = parent.center();
    let o = Vec3::new(
        if octant & 1 == 0 { min.x } else { center.x },
        if octant & 2 == 0 { min.y } else { center.y },
        if octant & 4 == 0 { min.z } else { center.z },
    );
    let half = (max - min) * 0.5;
    BoundingBox::from_origin(o, half.x, half.y, half.z)
}

/// Enlarges `b` by `ratio` of its own size on every side — the loose-octree
/// margin applied before a containment test.
fn loose_expand(b: &BoundingBox, ratio: f32) -> BoundingBox {
    let (min, max) = b.min_max();
    let size = max - min;
    let margin = size * ratio;
    BoundingBox::from_origin(min - margin, size.x + 2.0 * margin.x, size.y + 2.0 * margin.y, size.z + 2.0 * margin.z)
}

impl<O> Octree<O> {
    pub fn new(bounds: BoundingBox, strategy: InsertionStrategy) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(TreeNode {
            bounds,
            parent: None,
            children: None,
            elements: Vec::new(),
            visible: true,
            partially: false,
        });
        Octree { nodes, elements: SlotMap::with_key(), root, strategy }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn bounds(&self, node: NodeId) -> BoundingBox {
        self.nodes[node].bounds
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    pub fn children(&self, node: NodeId) -> Option<[NodeId; 8]> {
        self.nodes[node].children
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.nodes[node].visible
    }

    pub fn is_partially_visible(&self, node: NodeId) -> bool {
        self.nodes[node].partially
    }

    pub fn elements_at(&self, node: NodeId) -> &[ElementId] {
        &self.nodes[node].elements
    }

    pub fn element(&self, id: ElementId) -> Option<&OctreeElement<O>> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut OctreeElement<O>> {
        self.elements.get_mut(id)
    }

    /// The bounds a containment test is run against: the node's own AABB
    /// under `Normal`, or that AABB enlarged by the loose ratio under
    /// `Loose`.
    fn effective_bounds(&self, node: NodeId) -> BoundingBox {
        match self.strategy {
            InsertionStrategy::Normal => self.nodes[node].bounds,
            InsertionStrategy::Loose { ratio } => loose_expand(&self.nodes[node].bounds, ratio),
        }
    }

    /// Splits a leaf node into 8 equal-sized children covering the same
    /// volume. No-op (and does not error) if already subdivided.
    pub fn subdivide(&mut self, node: NodeId) {
        if self.nodes[node].children.is_some() {
            return;
        }
        let bounds = self.nodes[node].bounds;
        let mut ids = [NodeId::default(); 8];
        for (octant, id) in ids.iter_mut().enumerate() {
            *id = self.nodes.insert(TreeNode {
                bounds: octant_box(&bounds, octant as u8),
                parent: Some(node),
                children: None,
                elements: Vec::new(),
                visible: true,
                partially: false,
            });
        }
        self.nodes[node].children = Some(ids);
    }

    /// Inserts a fresh element with `sphere` and `owner`, descending from
    /// the root, and returns its id.
    pub fn insert_new(&mut self, sphere: BoundingSphere, owner: O) -> ElementId {
        let id = self.elements.insert(OctreeElement::new(sphere, owner));
        self.insert_from(self.root, id);
        id
    }

    /// `Insert`: descends from `start`, recursing into the first child that
    /// fully (loose: extended-) contains the element's sphere; stops and
    /// links the element at the current node otherwise.
    fn insert_from(&mut self, start: NodeId, id: ElementId) {
        let sphere = self.elements[id].sphere;
        let mut current = start;
        loop {
            let Some(children) = self.nodes[current].children else {
                self.nodes[current].elements.push(id);
                self.elements[id].node = Some(current);
                return;
            };

            match self.strategy {
                InsertionStrategy::Loose { .. } => {
                    let mut descended = false;
                    for child in children {
                        if self.effective_bounds(child).classify_sphere(&sphere) == Collision::In {
                            current = child;
                            descended = true;
                            break;
                        }
                    }
                    if !descended {
                        self.nodes[current].elements.push(id);
                        self.elements[id].node = Some(current);
                        return;
                    }
                }
                InsertionStrategy::Normal => {
                    let mut descended = false;
                    for child in children {
                        match self.nodes[child].bounds.classify_sphere(&sphere) {
                            Collision::In => {
                                current = child;
                                descended = true;
                                break;
                            }
                            // Stop descent on the first child the sphere straddles.
                            Collision::Partially => break,
                            Collision::Out => {}
                        }
                    }
                    if descended {
                        continue;
                    }
                    self.nodes[current].elements.push(id);
                    self.elements[id].node = Some(current);
                    return;
                }
            }
        }
    }

    fn unlink(&mut self, id: ElementId) {
        if let Some(node) = self.elements[id].node.take() {
            self.nodes[node].elements.retain(|e| *e != id);
        }
    }

    /// Removes `id` from the tree; its storage is dropped.
    pub fn remove(&mut self, id: ElementId) {
        self.unlink(id);
        self.elements.remove(id);
    }

    /// `ReinsertElement`: walks up ancestors from the element's current
    /// node until one's effective bounds fully contains its sphere, then
    /// re-inserts from there. Errors if no ancestor (including the root)
    /// qualifies — the sphere has moved outside the octree's own bounds.
    pub fn reinsert_element(&mut self, id: ElementId, sphere: BoundingSphere) -> Result<()> {
        self.elements[id].sphere = sphere;
        let mut cur = self
            .elements
            .get(id)
            .and_then(|e| e.node)
            .ok_or_else(|| engine_err!(Precondition, "octree element is not inserted"))?;

        loop {
            if self.effective_bounds(cur).classify_sphere(&sphere) == Collision::In {
                self.unlink(id);
                self.insert_from(cur, id);
                return Ok(());
            }
            match self.nodes[cur].parent {
                Some(p) => cur = p,
                None => engine_bail!(Precondition, "octree element's sphere lies outside the root AABB"),
            }
        }
    }

    /// `MarkVisibles`: classifies every node's AABB against `frustum`.
    /// `Out` clears `visible`/`partially` for the whole subtree (marks are
    /// reset every frame); `In` sets the whole subtree visible and stops
    /// descending; `Partially` marks this node and recurses into children.
    pub fn mark_visibles(&mut self, frustum: &Frustum) {
        self.mark_recursive(self.root, frustum);
    }

    fn mark_recursive(&mut self, node: NodeId, frustum: &Frustum) {
        let bounds = self.nodes[node].bounds;
        match frustum.classify_box(&bounds) {
            Collision::Out => self.set_subtree_visibility(node, false, false),
            Collision::In => self.set_subtree_visibility(node, true, false),
            Collision::Partially => {
                self.nodes[node].visible = true;
                self.nodes[node].partially = true;
                if let Some(children) = self.nodes[node].children {
                    for child in children {
                        self.mark_recursive(child, frustum);
                    }
                }
            }
        }
    }

    fn set_subtree_visibility(&mut self, node: NodeId, visible: bool, partially: bool) {
        self.nodes[node].visible = visible;
        self.nodes[node].partially = partially;
        if let Some(children) = self.nodes[node].children {
            for child in children {
                self.set_subtree_visibility(child, visible, partially);
            }
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
