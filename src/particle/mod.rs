//! A specialized CPU array whose entries spawn, update, and die under
//! client callbacks and back a [`crate::geometry::GeometryArray`].

mod buffer;

pub use buffer::{ParticleBuffer, ParticleHeader};
