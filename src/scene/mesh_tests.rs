use super::*;
use crate::device::{AttributeKind, PrimitiveType};
use crate::math::Quaternion;
use crate::skeleton::{Animation, Interpolator, Joint, KeySkeleton, Skeleton};
use glam::Vec3;

// root(0) at the bind-pose origin, child(1) offset +1 on x from its parent —
// both the base skeleton and the single animation key describe the same
// pose, so `skin` should reproduce each vertex's bind-local offset exactly.
fn bind_pose_joints() -> Vec<Joint> {
    vec![
        Joint::root(Vec3::ZERO, Quaternion::IDENTITY),
        Joint::new(Some(0), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY),
    ]
}

fn one_vertex_mesh() -> AnimatedMesh {
    let geometry = Geometry::new(PrimitiveType::Triangles);
    let base_skeleton = Skeleton::new(bind_pose_joints(), 1);
    let vertex_weights = vec![WeightedVertex { first_weight: 0, weight_count: 1 }];
    let weights = vec![VertexWeight { joint: 1, weight: 1.0, position: Vec3::new(0.5, 0.0, 0.0) }];
    AnimatedMesh::new(geometry, base_skeleton, vertex_weights, weights)
}

fn bind_pose_animation() -> Animation {
    let key = KeySkeleton::new(bind_pose_joints());
    Animation::new(vec![key], 24.0, Interpolator::Matrix).unwrap()
}

#[test]
fn add_attribute_rejects_length_mismatch() {
    let mut mesh = one_vertex_mesh();
    let err = mesh.add_attribute(AttributeKind::Position, vec![Vec3::ZERO, Vec3::ZERO], BufferPartition::Local);
    assert!(err.is_err());
}

#[test]
fn add_attribute_rejects_a_fifth_attribute() {
    let mut mesh = one_vertex_mesh();
    for _ in 0..4 {
        mesh.add_attribute(AttributeKind::Position, vec![Vec3::ZERO], BufferPartition::Local).unwrap();
    }
    let err = mesh.add_attribute(AttributeKind::Position, vec![Vec3::ZERO], BufferPartition::Local);
    assert!(err.is_err());
    assert_eq!(mesh.attributes().len(), 4);
}

#[test]
fn skin_at_bind_pose_reproduces_the_bind_local_offset() {
    let mut mesh = one_vertex_mesh();
    mesh.add_attribute(AttributeKind::Position, vec![Vec3::ZERO], BufferPartition::Local).unwrap();
    let animation = bind_pose_animation();

    mesh.skin(&animation).unwrap();

    let output = mesh.attributes()[0].output();
    assert!((output[0] - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn skin_rejects_a_joint_count_mismatch() {
    let mut mesh = one_vertex_mesh();
    let key = KeySkeleton::new(vec![Joint::root(Vec3::ZERO, Quaternion::IDENTITY)]);
    let mismatched = Animation::new(vec![key], 24.0, Interpolator::Matrix).unwrap();
    assert!(mesh.skin(&mismatched).is_err());
}
