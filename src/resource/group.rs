use super::cache::{ResourceCache, SceneResource};
use crate::device::DeviceBufferHandle;

/// Shader source handling is out of scope; this is the data contract a
/// `SceneEntity` binds to — a canonical name plus whatever opaque device
/// handle the backend assigned it.
#[derive(Debug, Clone)]
pub struct ShaderResource {
    pub name: String,
    pub handle: Option<DeviceBufferHandle>,
}

/// A material's resolved shader plus its scalar/texture parameter set is
/// entirely backend-defined; the scene core only needs the name for
/// dedup and an opaque blob the renderer interprets.
#[derive(Debug, Clone)]
pub struct MaterialResource {
    pub name: String,
    pub shader: Option<SceneResource<ShaderResource>>,
}

/// Image decoding is out of scope; a loaded texture is just its name, pixel
/// dimensions, and an opaque device handle once uploaded.
#[derive(Debug, Clone)]
pub struct TextureResource {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub handle: Option<DeviceBufferHandle>,
}

/// The three fixed resource groups every `Scene` owns: shaders, materials,
/// and texture unit 0. Each is an independent name-keyed dedup cache.
pub struct SceneResourceGroup {
    pub shaders: ResourceCache<ShaderResource>,
    pub materials: ResourceCache<MaterialResource>,
    pub texture_unit_0: ResourceCache<TextureResource>,
}

impl SceneResourceGroup {
    pub fn new() -> Self {
        SceneResourceGroup {
            shaders: ResourceCache::new(),
            materials: ResourceCache::new(),
            texture_unit_0: ResourceCache::new(),
        }
    }
}

impl Default for SceneResourceGroup {
    fn default() -> Self {
        SceneResourceGroup::new()
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
