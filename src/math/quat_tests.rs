use super::*;
use glam::Vec3;
use std::f32::consts::PI;

fn approx_eq(a: &Quaternion, b: &Quaternion, eps: f32) {
    assert!(a.dot(b).abs() > 1.0 - eps, "quaternions differ: {a:?} vs {b:?}");
}

#[test]
fn slerp_identity_cases() {
    let a = Quaternion::from_axis_angle(Vec3::Y, 0.0);
    let b = Quaternion::from_axis_angle(Vec3::Y, PI / 2.0);
    approx_eq(&Quaternion::slerp(&a, &a, 0.5), &a, 1e-4);
    approx_eq(&Quaternion::slerp(&a, &b, 0.0), &a, 1e-4);
    approx_eq(&Quaternion::slerp(&a, &b, 1.0), &b, 1e-4);
}

#[test]
fn slerp_midpoint_is_half_angle() {
    let a = Quaternion::from_axis_angle(Vec3::Y, 0.0);
    let b = Quaternion::from_axis_angle(Vec3::Y, PI / 2.0);
    let mid = Quaternion::slerp(&a, &b, 0.5);
    let expected = Quaternion::from_axis_angle(Vec3::Y, PI / 4.0);
    approx_eq(&mid, &expected, 1e-3);
}

#[test]
fn slerp_takes_shortest_path_when_dot_negative() {
    let a = Quaternion::from_axis_angle(Vec3::Y, 0.1);
    let b = Quaternion::new(-a.x(), -a.y(), -a.z(), -a.w()); // same rotation, negated
    let mid = Quaternion::slerp(&a, &b, 0.5);
    approx_eq(&mid, &a, 1e-3);
}

#[test]
fn conjugate_of_unit_quat_is_inverse() {
    let q = Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 1.23);
    let id = q.mul(&q.conjugate());
    approx_eq(&id, &Quaternion::IDENTITY, 1e-4);
}

#[test]
fn compute_w_reconstructs_unit_quat() {
    let q = Quaternion::from_axis_angle(Vec3::Z, 0.7);
    let rebuilt = Quaternion::compute_w(q.x(), q.y(), q.z());
    assert!((rebuilt.w() - q.w()).abs() < 1e-4);
}

#[test]
fn rotate_v3_matches_axis_angle_rotation() {
    let q = Quaternion::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2);
    let v = Vec3::new(1.0, 0.0, 0.0);
    let r = q.rotate_v3(v);
    assert!((r - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-4);
}
