use super::*;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::device::{MockDevice, PrimitiveType};
use crate::geometry::Geometry;
use crate::math::{Mat4, Mat4x3};
use crate::node::NodeId;
use crate::octree::InsertionStrategy;
use glam::Vec3;

fn triangle_geometry() -> Geometry {
    let mut g = Geometry::new(PrimitiveType::Triangles);
    g.set_data(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, None, None, 3, 0);
    g
}

/// One entity group with a single LOD-0 entity, riding a fresh node at the
/// scene root, plus the node itself — the common fixture every test below
/// builds on.
fn scene_with_one_instance() -> (Scene, EntityGroupId, NodeId, InstanceId) {
    let mut scene = Scene::new(BoundingBox::from_center(Vec3::ZERO, 2000.0, 2000.0, 2000.0), InsertionStrategy::Normal);
    let instance_group = scene.create_instance_group(triangle_geometry(), InstancingKind::Simple);
    let entity = scene.add_entity(SceneEntity::new(
        instance_group,
        BoundingBox::from_center(Vec3::ZERO, 1.0, 1.0, 1.0),
        BoundingSphere::new(Vec3::ZERO, 1.0),
    ));
    let group = scene.create_entity_group();
    scene.push_lod(group, entity).unwrap();

    let root = scene.root();
    let node = scene.create_node(root).unwrap();
    let instance = scene.add_instance(group, node, true, BoundingSphere::new(Vec3::ZERO, 1.0)).unwrap();
    (scene, group, node, instance)
}

fn move_node_to(scene: &mut Scene, node: NodeId, pos: Vec3) {
    let slots = scene.tree().group().clone();
    *scene.tree_mut().node_mut(node).unwrap().write_matrix_mut(&slots) = Mat4x3::from_translation(pos);
    scene.tree_mut().has_moved(node);
}

fn camera_looking_down_z(scene: &Scene) -> Camera {
    let mut camera = Camera::new(scene.root(), Viewport::new(0.0, 0.0, 800.0, 600.0));
    camera.set_view(Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y));
    camera.set_projection(Mat4::perspective_rh(60f32.to_radians(), 800.0 / 600.0, 0.1, 1000.0));
    camera
}

#[test]
fn add_instance_registers_it_under_its_group_and_node() {
    let (scene, group, node, instance) = scene_with_one_instance();
    let inst = scene.entity_group(group).unwrap().instance(instance).unwrap();
    assert_eq!(inst.node(), node);
    assert!(!inst.removed);
}

#[test]
fn remove_instance_drops_it_from_the_group() {
    let (mut scene, group, _node, instance) = scene_with_one_instance();
    scene.remove_instance(group, instance).unwrap();
    assert!(scene.entity_group(group).unwrap().instance(instance).is_none());
}

#[test]
fn update_reinserts_a_moved_instance_and_tracks_its_new_position() {
    let (mut scene, group, node, instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::new(5.0, 0.0, 0.0));

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    // The node's final matrix must have recomposed to the new position —
    // the octree reinsertion in `update` depends on reading it.
    let final_pos = scene.tree().node(node).unwrap().final_matrix().pos;
    assert_eq!(final_pos, Vec3::new(5.0, 0.0, 0.0));

    // instance still resolvable afterward, unaffected by reinsertion.
    assert!(scene.entity_group(group).unwrap().instance(instance).is_some());
}

#[test]
fn update_selects_instances_inside_the_frustum() {
    let (mut scene, group, node, instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::ZERO);

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let g = scene.entity_group(group).unwrap();
    assert!(g.selected().contains(&instance));
    assert!(g.instance(instance).unwrap().selected);
}

#[test]
fn update_deselects_instances_that_moved_outside_the_frustum() {
    let (mut scene, group, node, instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::new(1_000_000.0, 0.0, 0.0));

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let g = scene.entity_group(group).unwrap();
    assert!(!g.selected().contains(&instance));
    assert!(!g.instance(instance).unwrap().selected);
}

#[test]
fn update_selects_a_valid_lod_across_multiple_levels() {
    let (mut scene, group, node, instance) = scene_with_one_instance();
    // Add two coarser LOD levels to the same group.
    for _ in 0..2 {
        let ig = scene.create_instance_group(triangle_geometry(), InstancingKind::Simple);
        let e = scene.add_entity(SceneEntity::new(
            ig,
            BoundingBox::from_center(Vec3::ZERO, 1.0, 1.0, 1.0),
            BoundingSphere::new(Vec3::ZERO, 1.0),
        ));
        scene.push_lod(group, e).unwrap();
    }
    move_node_to(&mut scene, node, Vec3::new(0.0, 0.0, -50.0));

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let lod = scene.entity_group(group).unwrap().instance(instance).unwrap().lod.current();
    assert!(lod < 3);
}

#[test]
fn render_issues_a_draw_call_for_a_selected_instance() {
    let (mut scene, _group, node, _instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::ZERO);

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let mut device = MockDevice::new();
    scene.render(&mut device, &camera, None, None).unwrap();

    assert!(!device.draw_calls.is_empty());
}

#[test]
fn skybox_is_recentered_on_the_camera_during_render() {
    let (mut scene, group, node, _instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::ZERO);
    let skybox_instance = scene.entity_group(group).unwrap().instance_ids()[0];
    scene.set_skybox(Skybox::new(group, skybox_instance));

    let cam_node = scene.create_node(scene.root()).unwrap();
    move_node_to(&mut scene, cam_node, Vec3::new(3.0, 4.0, 5.0));
    let mut camera = Camera::new(cam_node, Viewport::new(0.0, 0.0, 800.0, 600.0));
    camera.set_view(Mat4::IDENTITY);
    camera.set_projection(Mat4::perspective_rh(60f32.to_radians(), 800.0 / 600.0, 0.1, 1000.0));

    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let mut device = MockDevice::new();
    scene.render(&mut device, &camera, None, None).unwrap();

    let skybox_pos = scene.tree().node(node).unwrap().final_matrix().pos;
    assert!((skybox_pos - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-4);
}

#[test]
fn lights_can_be_added_and_read_back() {
    let mut scene = Scene::new(BoundingBox::from_center(Vec3::ZERO, 100.0, 100.0, 100.0), InsertionStrategy::Normal);
    let root = scene.root();
    let node = scene.create_node(root).unwrap();
    let light = scene.add_light(Light::new(node, glam::Vec4::ONE, 1.0, 50.0));
    assert!(scene.light(light).is_some());
    assert_eq!(scene.light(light).unwrap().node(), node);
}

#[test]
fn render_with_lighting_flag_set_does_not_panic_with_active_lights() {
    let (mut scene, _group, node, _instance) = scene_with_one_instance();
    move_node_to(&mut scene, node, Vec3::ZERO);
    let light_node = scene.create_node(scene.root()).unwrap();
    scene.add_light(Light::new(light_node, glam::Vec4::ONE, 1.0, 500.0));

    let mut camera = camera_looking_down_z(&scene);
    scene.update(&mut camera, RenderTarget::Screen, None).unwrap();

    let mut device = MockDevice::new();
    scene.render(&mut device, &camera, None, None).unwrap();
}

#[test]
fn with_default_octree_uses_the_engine_configured_bounds() {
    let scene = Scene::with_default_octree();
    let bounds = scene.octree().bounds(scene.octree().root());
    assert!(bounds.width() > 0.0);
}

#[test]
fn track_node_gives_a_node_its_own_octree_element() {
    let mut scene = Scene::new(BoundingBox::from_center(Vec3::ZERO, 100.0, 100.0, 100.0), InsertionStrategy::Normal);
    let root = scene.root();
    let node = scene.create_node(root).unwrap();
    let element = scene.track_node(node, BoundingSphere::new(Vec3::ZERO, 1.0)).unwrap();
    assert_eq!(scene.tree().node(node).unwrap().octree_element(), Some(element));
}
