use super::interpolate::Interpolator;
use super::skeleton::KeySkeleton;
use crate::math::Mat4x3;
use crate::{engine_bail, error::Result};

/// Per-frame accumulator stepping through a sequence of [`KeySkeleton`]s at
/// a fixed frequency, producing the blended pose of the current instant in
/// `key`.
pub struct Animation {
    keys: Vec<KeySkeleton>,
    freq: f32,
    interpolator: Interpolator,
    elapsed: f32,
    weight: f32,
    current: usize,
    next: usize,
    key: Vec<Mat4x3>,
}

impl Animation {
    pub fn new(keys: Vec<KeySkeleton>, freq: f32, interpolator: Interpolator) -> Result<Self> {
        if keys.is_empty() {
            engine_bail!(Precondition, "animation requires at least one keyframe");
        }
        let joint_count = keys[0].joints.len();
        let mut anim = Animation {
            keys,
            freq,
            interpolator,
            elapsed: 0.0,
            weight: 0.0,
            current: 0,
            next: 0,
            key: vec![Mat4x3::IDENTITY; joint_count],
        };
        anim.start();
        Ok(anim)
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&self) -> usize {
        self.next
    }

    pub fn key(&self) -> &[Mat4x3] {
        &self.key
    }

    /// `Anim_Start`.
    pub fn start(&mut self) {
        self.weight = 0.0;
        self.current = 0;
        self.next = 1 % self.keys.len();
        self.elapsed = 0.0;
        self.compute_current_key();
    }

    /// `Anim_Animate`: advances the accumulator by `dt` seconds and
    /// refreshes `key` via the chosen interpolator.
    pub fn animate(&mut self, dt: f32) {
        let n = self.keys.len();
        self.elapsed += dt;
        let addframes = self.elapsed * self.freq;
        let whole = addframes.floor();
        self.weight = addframes - whole;
        let advance = whole as i64;
        self.current = Self::wrap(self.current as i64 + advance, n);
        self.next = Self::wrap(self.next as i64 + advance, n);
        self.elapsed -= whole / self.freq;
        self.compute_current_key();
    }

    fn wrap(v: i64, n: usize) -> usize {
        let n = n as i64;
        (((v % n) + n) % n) as usize
    }

    fn compute_current_key(&mut self) {
        let n = self.keys.len();
        if n == 1 {
            self.key.copy_from_slice(&self.keys[0].joints.iter().map(|j| j.compute_matrix()).collect::<Vec<_>>());
            return;
        }
        self.interpolator.interpolate_into(&self.keys[self.current], &self.keys[self.next], self.weight, &mut self.key);
    }
}

#[cfg(test)]
#[path = "animation_tests.rs"]
mod tests;
