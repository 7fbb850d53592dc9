//! Interleavable vertex arrays grouped into a drawable geometry, with
//! per-array update callbacks and lazily-recomputed bounding volumes.

mod array;
mod geometry;

pub use array::{ArrayUser, GeometryArray};
pub use geometry::Geometry;
