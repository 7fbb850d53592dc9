use super::*;
use crate::math::Mat4x3;
use crate::node::Tree;
use glam::Vec3;

fn moved_node(tree: &mut Tree, translation: Vec3) -> NodeId {
    let root = tree.root();
    let node = tree.create_node();
    tree.set_parent(node, root).unwrap();
    let group = tree.group().clone();
    *tree.node_mut(node).unwrap().write_matrix_mut(&group) = Mat4x3::from_translation(translation);
    tree.has_moved(node);
    tree.update_root_recursive();
    node
}

#[test]
fn position_tracks_owning_node() {
    let mut tree = Tree::new();
    let node = moved_node(&mut tree, Vec3::new(1.0, 2.0, 3.0));
    let light = Light::new(node, Vec4::ONE, 1.0, 50.0);
    assert_eq!(light.position(&tree), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn bounding_sphere_sized_by_attenuation_radius() {
    let mut tree = Tree::new();
    let node = moved_node(&mut tree, Vec3::new(5.0, 0.0, 0.0));
    let mut light = Light::new(node, Vec4::ONE, 1.0, 25.0);
    let sphere = light.bounding_sphere(&tree);
    assert_eq!(sphere.radius, 25.0);
    assert_eq!(sphere.center, Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn direction_defaults_to_forward_for_identity_rotation() {
    let mut tree = Tree::new();
    let node = moved_node(&mut tree, Vec3::ZERO);
    let light = Light::new(node, Vec4::ONE, 1.0, 10.0);
    assert_eq!(light.direction(&tree), Vec3::NEG_Z);
}
