use crate::math::{Mat4x3, Quaternion};
use glam::Vec3;

/// One joint: its parent index (`None` = root), local position, and local
/// orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub parent: Option<u32>,
    pub position: Vec3,
    pub orientation: Quaternion,
}

impl Joint {
    pub fn new(parent: Option<u32>, position: Vec3, orientation: Quaternion) -> Self {
        Joint { parent, position, orientation }
    }

    pub fn root(position: Vec3, orientation: Quaternion) -> Self {
        Joint::new(None, position, orientation)
    }

    /// `Joint_ComputeMatrix`: rotation from the orientation quaternion,
    /// translation from position.
    pub fn compute_matrix(&self) -> Mat4x3 {
        Mat4x3::from_translation_rotation(self.position, self.orientation)
    }
}

#[cfg(test)]
#[path = "joint_tests.rs"]
mod tests;
