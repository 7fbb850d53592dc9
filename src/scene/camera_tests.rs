use super::*;
use crate::math::Mat4x3;
use crate::node::Tree;
use glam::Vec3;

#[test]
fn new_camera_has_identity_matrices_and_zero_sphere() {
    let mut tree = Tree::new();
    let node = tree.create_node();
    let camera = Camera::new(node, Viewport::new(0.0, 0.0, 1024.0, 768.0));
    assert_eq!(*camera.view_matrix(), Mat4::IDENTITY);
    assert_eq!(*camera.projection_matrix(), Mat4::IDENTITY);
    assert_eq!(camera.sphere().center, Vec3::ZERO);
}

#[test]
fn set_view_recomputes_inverse_and_view_proj() {
    let mut tree = Tree::new();
    let node = tree.create_node();
    let mut camera = Camera::new(node, Viewport::new(0.0, 0.0, 800.0, 600.0));
    let view = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
    camera.set_view(view);
    assert_eq!(*camera.view_matrix(), view);
    let roundtrip = *camera.view_matrix() * *camera.view_matrix_inverse();
    assert!((roundtrip.w_axis - Mat4::IDENTITY.w_axis).length() < 1e-4);
}

#[test]
fn update_from_node_positions_sphere_at_final_translation() {
    let mut tree = Tree::new();
    let root = tree.root();
    let cam_node = tree.create_node();
    tree.set_parent(cam_node, root).unwrap();
    let group = tree.group().clone();
    *tree.node_mut(cam_node).unwrap().write_matrix_mut(&group) =
        Mat4x3::from_translation(Vec3::new(10.0, 20.0, 30.0));
    tree.has_moved(cam_node);
    tree.update_root_recursive();

    let mut camera = Camera::new(cam_node, Viewport::new(0.0, 0.0, 1.0, 1.0));
    camera.update_from_node(&tree);
    assert_eq!(camera.sphere().center, Vec3::new(10.0, 20.0, 30.0));
    assert_eq!(camera.position(&tree), Vec3::new(10.0, 20.0, 30.0));
}

#[test]
fn viewport_aspect_ratio() {
    let v = Viewport::new(0.0, 0.0, 1024.0, 768.0);
    assert!((v.aspect_ratio() - (1024.0 / 768.0)).abs() < 1e-6);
}
