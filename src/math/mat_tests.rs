use super::*;
use crate::math::Quaternion;
use glam::Vec3;

#[test]
fn identity_mul_identity_is_identity() {
    let a = Mat4x3::IDENTITY;
    let b = Mat4x3::IDENTITY;
    assert_eq!(a.mul(&b), Mat4x3::IDENTITY);
}

#[test]
fn mul_then_inverse_round_trips_a_point() {
    let q = Quaternion::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_3);
    let m = Mat4x3::from_translation_rotation(Vec3::new(1.0, 2.0, 3.0), q);
    let inv = m.inverse();
    let p = Vec3::new(5.0, -1.0, 2.0);
    let transformed = m.mul_vec3(p);
    let back = inv.mul_vec3(transformed);
    assert!((back - p).length() < 1e-4);
}

#[test]
fn mul_in_place_matches_mul() {
    let a = Mat4x3::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let b = Mat4x3::from_translation(Vec3::new(0.0, 2.0, 0.0));
    let mut c = a;
    c.mul_in_place(&b);
    assert_eq!(c, a.mul(&b));
    assert_eq!(c.pos, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn blend_is_componentwise() {
    let a = Mat4x3::from_translation(Vec3::ZERO);
    let b = Mat4x3::from_translation(Vec3::new(10.0, 0.0, 0.0));
    let mid = Mat4x3::blend(&a, &b, 0.5);
    assert!((mid.pos.x - 5.0).abs() < 1e-6);
}

#[test]
fn rows_carries_translation_in_fourth_component() {
    let m = Mat4x3::from_translation(Vec3::new(1.0, 2.0, 3.0));
    let rows = m.rows();
    assert_eq!(rows[0].w, 1.0);
    assert_eq!(rows[1].w, 2.0);
    assert_eq!(rows[2].w, 3.0);
}
