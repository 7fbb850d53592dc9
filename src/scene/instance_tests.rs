use super::*;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::math::Mat4x3;
use crate::node::Tree;
use crate::octree::{InsertionStrategy, Octree};
use crate::scene::{EntityId, Viewport};
use glam::Vec3;
use slotmap::SlotMap;

fn build_octree() -> Octree<()> {
    Octree::new(BoundingBox::from_center(Vec3::ZERO, 1000.0, 1000.0, 1000.0), InsertionStrategy::Normal)
}

#[test]
fn new_instance_starts_unselected_and_not_removed() {
    let mut tree = Tree::new();
    let node = tree.create_node();
    let mut octree = build_octree();
    let elem = octree.insert_new(BoundingSphere::new(Vec3::ZERO, 1.0), ());
    let instance = SceneEntityInstance::new(node, true, elem);
    assert!(!instance.selected);
    assert!(!instance.removed);
    assert!(instance.owns_node());
    assert_eq!(instance.lod.current(), 0);
}

#[test]
fn default_get_lod_is_monotonically_decreasing_in_area() {
    // DetermineInstanceLOD relies on a coarser LOD as projected area
    // shrinks (i.e. as the instance recedes from the camera).
    assert!(default_get_lod(0.01) >= default_get_lod(1.0));
    assert!(default_get_lod(1.0) >= default_get_lod(100.0));
}

#[test]
fn determine_instance_lod_selects_a_valid_lod_index() {
    let mut tree = Tree::new();
    let root = tree.root();
    let node = tree.create_node();
    tree.set_parent(node, root).unwrap();
    let slots = tree.group().clone();
    *tree.node_mut(node).unwrap().write_matrix_mut(&slots) = Mat4x3::from_translation(Vec3::new(0.0, 0.0, -50.0));
    tree.has_moved(node);
    tree.update_root_recursive();

    let mut octree = build_octree();
    let elem = octree.insert_new(BoundingSphere::new(Vec3::ZERO, 1.0), ());
    let mut instance = SceneEntityInstance::new(node, true, elem);

    let mut cam_tree = Tree::new();
    let cam_node = cam_tree.create_node();
    let mut camera = Camera::new(cam_node, Viewport::new(0.0, 0.0, 1024.0, 768.0));
    camera.set_projection(glam::Mat4::perspective_rh(60f32.to_radians(), 1024.0 / 768.0, 0.1, 1000.0));

    let mut entities: SlotMap<EntityId, ()> = SlotMap::with_key();
    let mut group = SceneEntityGroup::new();
    for _ in 0..3 {
        group.push_lod(entities.insert(()));
    }

    let lod_box = BoundingBox::from_center(Vec3::ZERO, 1.0, 1.0, 1.0);
    determine_instance_lod(&tree, &mut instance, group.entities().len(), &lod_box, &camera).unwrap();
    assert!(instance.lod.current() < 3);
}
