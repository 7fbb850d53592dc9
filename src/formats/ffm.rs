//! `FFM`: a fully specified little-endian mesh container.
//!
//! Layout: 4-byte magic `b"FFM0"`, then a signed 32-bit mesh count. Per
//! mesh: signed 32-bit vertex count, a `has_tex` byte, a `has_nor` byte,
//! `vcount` positions (3 floats each), `vcount` texcoords (2 floats each)
//! if `has_tex != 0`, `vcount` normals (3 floats each) if `has_nor != 0`,
//! then a signed 32-bit index size in bytes (0 meaning no index array),
//! a signed 32-bit index count, and `icount * index_size` bytes of
//! little-endian indices (1, 2, or 4 bytes wide).

use crate::engine_bail;
use crate::error::Result;
use crate::math::{Vec2, Vec3};

pub const FFM_MAGIC: [u8; 4] = *b"FFM0";

#[derive(Debug, Clone, Default)]
pub struct FfmMesh {
    pub positions: Vec<Vec3>,
    pub texcoords: Option<Vec<Vec2>>,
    pub normals: Option<Vec<Vec3>>,
    pub indices: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default)]
pub struct FfmFile {
    pub meshes: Vec<FfmMesh>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos + n;
        if end > self.bytes.len() {
            engine_bail!(Codec, "ffm: unexpected end of data at offset {}", self.pos);
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.f32()?, self.f32()?))
    }
}

/// Parses an in-memory `FFM` blob.
pub fn read(bytes: &[u8]) -> Result<FfmFile> {
    let mut r = Reader::new(bytes);
    let magic = r.take(4)?;
    if magic != FFM_MAGIC {
        engine_bail!(Codec, "ffm: bad magic {:?}", magic);
    }
    let n_meshes = r.i32()?;
    if n_meshes < 0 {
        engine_bail!(Codec, "ffm: negative mesh count {}", n_meshes);
    }

    let mut meshes = Vec::with_capacity(n_meshes as usize);
    for _ in 0..n_meshes {
        let vcount = r.i32()?;
        if vcount < 0 {
            engine_bail!(Codec, "ffm: negative vertex count {}", vcount);
        }
        let vcount = vcount as usize;
        let has_tex = r.u8()? != 0;
        let has_nor = r.u8()? != 0;

        let mut positions = Vec::with_capacity(vcount);
        for _ in 0..vcount {
            positions.push(r.vec3()?);
        }

        let texcoords = if has_tex {
            let mut v = Vec::with_capacity(vcount);
            for _ in 0..vcount {
                v.push(r.vec2()?);
            }
            Some(v)
        } else {
            None
        };

        let normals = if has_nor {
            let mut v = Vec::with_capacity(vcount);
            for _ in 0..vcount {
                v.push(r.vec3()?);
            }
            Some(v)
        } else {
            None
        };

        let index_size = r.i32()?;
        let icount = r.i32()?;
        if icount < 0 {
            engine_bail!(Codec, "ffm: negative index count {}", icount);
        }
        let icount = icount as usize;

        let indices = match index_size {
            0 => None,
            1 => {
                let mut v = Vec::with_capacity(icount);
                for _ in 0..icount {
                    v.push(r.u8()? as u32);
                }
                Some(v)
            }
            2 => {
                let mut v = Vec::with_capacity(icount);
                for _ in 0..icount {
                    let b = r.take(2)?;
                    v.push(u16::from_le_bytes([b[0], b[1]]) as u32);
                }
                Some(v)
            }
            4 => {
                let mut v = Vec::with_capacity(icount);
                for _ in 0..icount {
                    let b = r.take(4)?;
                    v.push(u32::from_le_bytes([b[0], b[1], b[2], b[3]]));
                }
                Some(v)
            }
            other => engine_bail!(Codec, "ffm: unsupported index size {}", other),
        };

        meshes.push(FfmMesh { positions, texcoords, normals, indices });
    }

    Ok(FfmFile { meshes })
}

/// Serializes to `FFM`. Index arrays with fewer than 65536 indices are
/// narrowed to 16-bit on write, regardless of the widest value actually
/// referenced by the mesh.
pub fn write(file: &FfmFile) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&FFM_MAGIC);
    out.extend_from_slice(&(file.meshes.len() as i32).to_le_bytes());

    for mesh in &file.meshes {
        let vcount = mesh.positions.len();
        out.extend_from_slice(&(vcount as i32).to_le_bytes());
        out.push(mesh.texcoords.is_some() as u8);
        out.push(mesh.normals.is_some() as u8);

        for p in &mesh.positions {
            out.extend_from_slice(&p.x.to_le_bytes());
            out.extend_from_slice(&p.y.to_le_bytes());
            out.extend_from_slice(&p.z.to_le_bytes());
        }
        if let Some(texcoords) = &mesh.texcoords {
            for t in texcoords {
                out.extend_from_slice(&t.x.to_le_bytes());
                out.extend_from_slice(&t.y.to_le_bytes());
            }
        }
        if let Some(normals) = &mesh.normals {
            for n in normals {
                out.extend_from_slice(&n.x.to_le_bytes());
                out.extend_from_slice(&n.y.to_le_bytes());
                out.extend_from_slice(&n.z.to_le_bytes());
            }
        }

        match &mesh.indices {
            None => {
                out.extend_from_slice(&0i32.to_le_bytes());
                out.extend_from_slice(&0i32.to_le_bytes());
            }
            Some(indices) => {
                let icount = indices.len();
                let narrow = icount < 65536;
                let index_size: i32 = if narrow { 2 } else { 4 };
                out.extend_from_slice(&index_size.to_le_bytes());
                out.extend_from_slice(&(icount as i32).to_le_bytes());
                for &idx in indices {
                    if narrow {
                        out.extend_from_slice(&(idx as u16).to_le_bytes());
                    } else {
                        out.extend_from_slice(&idx.to_le_bytes());
                    }
                }
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "ffm_tests.rs"]
mod tests;
