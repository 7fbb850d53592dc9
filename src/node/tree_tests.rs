use super::*;
use crate::math::Mat4x3;
use glam::Vec3;

#[test]
fn propagation_scenario_root_child_grandchild() {
    // Scenario 3: root R; child A; grandchild B. Write matrix of A =
    // translate(5,0,0); HasMoved(A); update root. Expect A.final =
    // R.final * translate(5,0,0); B.final = A.final * B.read; marks clear.
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create_node();
    let b = tree.create_node();
    tree.set_parent(a, root).unwrap();
    tree.set_parent(b, a).unwrap();

    let group = tree.group().clone();
    *tree.node_mut(a).unwrap().write_matrix_mut(&group) = Mat4x3::from_translation(Vec3::new(5.0, 0.0, 0.0));
    tree.has_moved(a);
    tree.update_root_recursive();

    let expected_a = Mat4x3::IDENTITY.mul(&Mat4x3::from_translation(Vec3::new(5.0, 0.0, 0.0)));
    assert_eq!(*tree.node(a).unwrap().final_matrix(), expected_a);

    let b_read = *tree.node(b).unwrap().read_matrix(&group);
    let expected_b = expected_a.mul(&b_read);
    assert_eq!(*tree.node(b).unwrap().final_matrix(), expected_b);

    assert!(!tree.node(a).unwrap().has_moved());
    assert!(!tree.node(b).unwrap().has_moved());
}

#[test]
fn has_moved_relinks_into_to_update() {
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create_node();
    tree.set_parent(a, root).unwrap();
    assert!(tree.node(root).unwrap().children().contains(&a));

    tree.has_moved(a);
    assert!(!tree.node(root).unwrap().children.contains(&a));
    assert!(tree.node(root).unwrap().to_update.contains(&a));
}

#[test]
fn has_moved_is_idempotent() {
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create_node();
    tree.set_parent(a, root).unwrap();
    tree.has_moved(a);
    tree.has_moved(a);
    assert_eq!(tree.node(root).unwrap().to_update.iter().filter(|c| **c == a).count(), 1);
}

#[test]
fn unmoved_node_keeps_stale_final_until_updated() {
    let mut tree = Tree::new();
    let root = tree.root();
    let a = tree.create_node();
    tree.set_parent(a, root).unwrap();
    tree.update_root_recursive();
    assert_eq!(*tree.node(a).unwrap().final_matrix(), Mat4x3::IDENTITY);
}
