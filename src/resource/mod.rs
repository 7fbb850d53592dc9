//! Name-keyed, ref-counted resource caching: the `SceneResourceGroup`
//! groups this crate exposes (shaders, materials, texture unit 0) and the
//! generic cache that backs each of them.

mod cache;
mod group;

pub use cache::{ResourceCache, SceneResource};
pub use group::{MaterialResource, SceneResourceGroup, ShaderResource, TextureResource};
