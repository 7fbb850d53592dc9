//! `WAR`: an OBJ-like text mesh format. Only the data contract its loader
//! must produce is specified — positions, optional texcoords, optional
//! normals, and face corners referencing them by index triplet — not a
//! full grammar. The parser here is a minimal conforming implementation:
//! `v`/`vt`/`vn`/`f` records, one per line, `#` comments, triangulated
//! faces only.

use crate::engine_bail;
use crate::error::Result;
use crate::math::{Vec2, Vec3};

/// A face corner's `position/texcoord/normal` index triplet, 0-based.
/// `texcoord`/`normal` are `None` when the corner omitted that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceCorner {
    pub position: u32,
    pub texcoord: Option<u32>,
    pub normal: Option<u32>,
}

/// The raw, unindexed contract a `WAR` loader produces: parallel
/// attribute pools plus a face-corner list referencing them by index
/// triplet, exactly as authored (no shared-vertex welding yet).
#[derive(Debug, Clone, Default)]
pub struct WarMesh {
    pub positions: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<[FaceCorner; 3]>,
}

fn parse_index(tok: &str, len: usize) -> Result<u32> {
    let raw: i64 = tok
        .parse()
        .map_err(|_| crate::engine_err!(Codec, "war: bad index token {:?}", tok))?;
    // OBJ-style: positive is 1-based from the start, negative is 1-based
    // from the end of the pool seen so far.
    let idx = if raw > 0 { raw - 1 } else { len as i64 + raw };
    if idx < 0 {
        engine_bail!(Codec, "war: index {} out of range", raw);
    }
    Ok(idx as u32)
}

fn parse_corner(tok: &str, positions: usize, texcoords: usize, normals: usize) -> Result<FaceCorner> {
    let mut parts = tok.split('/');
    let p = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| crate::engine_err!(Codec, "war: empty face corner"))?;
    let t = parts.next().filter(|s| !s.is_empty());
    let n = parts.next().filter(|s| !s.is_empty());

    Ok(FaceCorner {
        position: parse_index(p, positions)?,
        texcoord: t.map(|s| parse_index(s, texcoords)).transpose()?,
        normal: n.map(|s| parse_index(s, normals)).transpose()?,
    })
}

/// Parses a `WAR` text blob into its raw, unindexed contract.
pub fn read(text: &str) -> Result<WarMesh> {
    let mut mesh = WarMesh::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };
        let rest: Vec<&str> = tokens.collect();

        match tag {
            "v" => {
                let [x, y, z] = floats3(&rest)?;
                mesh.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = floats2(&rest)?;
                mesh.texcoords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = floats3(&rest)?;
                mesh.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                if rest.len() != 3 {
                    engine_bail!(Codec, "war: only triangulated faces are supported, got {} corners", rest.len());
                }
                let mut corners = [FaceCorner { position: 0, texcoord: None, normal: None }; 3];
                for (i, tok) in rest.iter().enumerate() {
                    corners[i] = parse_corner(tok, mesh.positions.len(), mesh.texcoords.len(), mesh.normals.len())?;
                }
                mesh.faces.push(corners);
            }
            _ => continue,
        }
    }

    Ok(mesh)
}

fn floats3(tokens: &[&str]) -> Result<[f32; 3]> {
    if tokens.len() != 3 {
        engine_bail!(Codec, "war: expected 3 components, got {}", tokens.len());
    }
    Ok([parse_f32(tokens[0])?, parse_f32(tokens[1])?, parse_f32(tokens[2])?])
}

fn floats2(tokens: &[&str]) -> Result<[f32; 2]> {
    if tokens.len() != 2 {
        engine_bail!(Codec, "war: expected 2 components, got {}", tokens.len());
    }
    Ok([parse_f32(tokens[0])?, parse_f32(tokens[1])?])
}

fn parse_f32(tok: &str) -> Result<f32> {
    tok.parse().map_err(|_| crate::engine_err!(Codec, "war: bad float token {:?}", tok))
}

/// Dedupes `(position, texcoord, normal)` corner triplets into a single
/// interleaved vertex pool plus an index array — the "generate-indices"
/// post-processing mode.
pub fn war_generate_indices(mesh: &WarMesh) -> (Vec<(Vec3, Option<Vec2>, Option<Vec3>)>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut seen: std::collections::HashMap<(u32, Option<u32>, Option<u32>), u32> = std::collections::HashMap::new();
    let mut indices = Vec::with_capacity(mesh.faces.len() * 3);

    for face in &mesh.faces {
        for corner in face {
            let key = (corner.position, corner.texcoord, corner.normal);
            let idx = *seen.entry(key).or_insert_with(|| {
                let v = (
                    mesh.positions[corner.position as usize],
                    corner.texcoord.map(|t| mesh.texcoords[t as usize]),
                    corner.normal.map(|n| mesh.normals[n as usize]),
                );
                vertices.push(v);
                (vertices.len() - 1) as u32
            });
            indices.push(idx);
        }
    }

    (vertices, indices)
}

/// Unrolls every face corner into its own vertex, producing a
/// non-indexed, flat triangle list — the "expand-vertices" post-processing
/// mode.
pub fn war_expand_vertices(mesh: &WarMesh) -> Vec<(Vec3, Option<Vec2>, Option<Vec3>)> {
    mesh.faces
        .iter()
        .flat_map(|face| face.iter())
        .map(|corner| {
            (
                mesh.positions[corner.position as usize],
                corner.texcoord.map(|t| mesh.texcoords[t as usize]),
                corner.normal.map(|n| mesh.normals[n as usize]),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "war_tests.rs"]
mod tests;
