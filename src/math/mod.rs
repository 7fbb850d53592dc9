//! Math primitives: vectors (re-exported from `glam`), matrices, quaternions.

mod mat;
mod quat;

pub use glam::{Vec2, Vec3, Vec4};
pub use mat::{Mat3, Mat4, Mat4x3};
pub use quat::Quaternion;
