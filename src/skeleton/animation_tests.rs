use super::*;
use crate::skeleton::joint::Joint;
use glam::Vec3;

fn keys() -> Vec<KeySkeleton> {
    (0..4)
        .map(|i| KeySkeleton::new(vec![Joint::root(Vec3::new(i as f32, 0.0, 0.0), crate::math::Quaternion::IDENTITY)]))
        .collect()
}

#[test]
fn start_resets_accumulator() {
    let mut anim = Animation::new(keys(), 2.0, Interpolator::Linear).unwrap();
    anim.animate(10.0);
    anim.start();
    assert_eq!(anim.weight(), 0.0);
    assert_eq!(anim.current(), 0);
    assert_eq!(anim.next(), 1);
}

#[test]
fn animate_advances_weight_and_indices_within_bounds() {
    let mut anim = Animation::new(keys(), 2.0, Interpolator::Linear).unwrap();
    // freq=2Hz, 4 keys: one full cycle every 2s. Step in increments that
    // land mid-frame to exercise the fractional weight.
    for _ in 0..37 {
        anim.animate(0.1);
        assert!(anim.weight() >= 0.0 && anim.weight() < 1.0);
        assert!(anim.current() < 4);
        assert!(anim.next() < 4);
    }
}

#[test]
fn animate_wraps_exactly_once_per_full_cycle() {
    let mut anim = Animation::new(keys(), 2.0, Interpolator::Linear).unwrap();
    // N=4 keys at freq=2Hz -> one full lap every N/freq = 2.0s.
    anim.animate(2.0);
    assert_eq!(anim.current(), 0);
    assert_eq!(anim.next(), 1);
}

#[test]
fn single_keyframe_animation_holds_steady() {
    let mut anim = Animation::new(vec![key_zero()], 1.0, Interpolator::Linear).unwrap();
    anim.animate(5.0);
    assert_eq!(anim.key()[0].pos, Vec3::ZERO);
}

fn key_zero() -> KeySkeleton {
    KeySkeleton::new(vec![Joint::root(Vec3::ZERO, crate::math::Quaternion::IDENTITY)])
}

#[test]
fn empty_keyframe_list_is_rejected() {
    assert!(Animation::new(vec![], 1.0, Interpolator::Linear).is_err());
}
