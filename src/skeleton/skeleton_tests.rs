use super::*;
use crate::math::Quaternion;
use glam::Vec3;

fn flat_joints() -> Vec<Joint> {
    // root(0) -> child(1) -> grandchild(2), each offset +1 on x, no rotation.
    vec![
        Joint::root(Vec3::ZERO, Quaternion::IDENTITY),
        Joint::new(Some(0), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY),
        Joint::new(Some(1), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY),
    ]
}

#[test]
fn sort_joints_is_a_no_op_when_already_ordered() {
    let mut skel = Skeleton::new(flat_joints(), 1);
    skel.sort_joints();
    assert_eq!(skel.joints()[0].parent, None);
    assert_eq!(skel.joints()[1].parent, Some(0));
    assert_eq!(skel.joints()[2].parent, Some(1));
}

#[test]
fn sort_joints_reorders_out_of_order_parent_child() {
    // joint 0 has parent 1, which is listed after it: parent-before-child
    // invariant is violated until sort_joints runs.
    let joints = vec![
        Joint::new(Some(1), Vec3::new(1.0, 0.0, 0.0), Quaternion::IDENTITY),
        Joint::root(Vec3::ZERO, Quaternion::IDENTITY),
    ];
    let mut skel = Skeleton::new(joints, 1);
    skel.sort_joints();
    for (idx, j) in skel.joints().iter().enumerate() {
        if let Some(p) = j.parent {
            assert!((p as usize) < idx);
        }
    }
    assert_eq!(skel.joints().len(), 2);
}

#[test]
fn compute_absolute_joints_chains_parent_transforms() {
    let mut skel = Skeleton::new(flat_joints(), 1);
    skel.compute_absolute_joints();
    assert_eq!(skel.joints()[0].position, Vec3::ZERO);
    assert_eq!(skel.joints()[1].position, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(skel.joints()[2].position, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn absolute_into_matches_parent_child_composition() {
    let mut skel = Skeleton::new(flat_joints(), 2);
    for (i, j) in skel.joints().to_vec().iter().enumerate() {
        skel.slot_mut(0)[i] = j.compute_matrix();
    }
    skel.absolute_into(0, 1).unwrap();
    assert_eq!(skel.slot(1)[0].pos, Vec3::ZERO);
    assert_eq!(skel.slot(1)[1].pos, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(skel.slot(1)[2].pos, Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn mul_into_composes_elementwise() {
    let mut skel = Skeleton::new(flat_joints(), 2);
    skel.slot_mut(0).iter_mut().for_each(|m| *m = crate::math::Mat4x3::from_translation(Vec3::new(1.0, 0.0, 0.0)));
    skel.slot_mut(1).iter_mut().for_each(|m| *m = crate::math::Mat4x3::from_translation(Vec3::new(0.0, 2.0, 0.0)));
    skel.mul_into(0, 1);
    assert_eq!(skel.slot(0)[0].pos, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn mul_copy_into_leaves_operands_untouched() {
    let mut skel = Skeleton::new(flat_joints(), 3);
    skel.slot_mut(0).iter_mut().for_each(|m| *m = crate::math::Mat4x3::from_translation(Vec3::new(1.0, 0.0, 0.0)));
    skel.slot_mut(1).iter_mut().for_each(|m| *m = crate::math::Mat4x3::from_translation(Vec3::new(0.0, 2.0, 0.0)));
    skel.mul_copy_into(2, 0, 1);
    assert_eq!(skel.slot(0)[0].pos, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(skel.slot(1)[0].pos, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(skel.slot(2)[0].pos, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn inverse_into_round_trips_a_point() {
    let mut skel = Skeleton::new(flat_joints(), 2);
    let q = Quaternion::from_axis_angle(Vec3::Y, 0.6);
    skel.slot_mut(0).iter_mut().for_each(|m| *m = crate::math::Mat4x3::from_translation_rotation(Vec3::new(3.0, 0.0, 0.0), q));
    skel.inverse_into(1, 0);
    let p = Vec3::new(1.0, 1.0, 1.0);
    let fwd = skel.slot(0)[0].mul_vec3(p);
    let back = skel.slot(1)[0].mul_vec3(fwd);
    assert!((back - p).length() < 1e-4);
}
