//! `MD5`: a skeleton-based text format for a mesh (base skeleton, per-
//! vertex weight ranges, per-weight joint/weight/position records, and a
//! triangle index array) and an animation (a key skeleton per frame plus
//! a frame rate). Only this data contract is specified, not the full
//! `.md5mesh`/`.md5anim` grammar; the parsers below are minimal
//! conforming implementations of a block-structured text subset.

use crate::engine_bail;
use crate::error::Result;
use crate::math::Quaternion;
use crate::skeleton::{Joint, KeySkeleton, Skeleton};
use glam::Vec3;

/// One `(joint, weight, weighted position)` contribution to a vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Md5Weight {
    pub joint: u32,
    pub weight: f32,
    pub position: Vec3,
}

/// A vertex's weight range: `weight_count` consecutive entries in the
/// mesh's flat weight array, starting at `first_weight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Md5VertexWeights {
    pub first_weight: u32,
    pub weight_count: u32,
}

#[derive(Debug)]
pub struct Md5Mesh {
    pub base_skeleton: Skeleton,
    pub vertex_weights: Vec<Md5VertexWeights>,
    pub weights: Vec<Md5Weight>,
    pub indices: Vec<u32>,
}

#[derive(Debug)]
pub struct Md5Anim {
    pub keys: Vec<KeySkeleton>,
    pub frame_rate: f32,
}

struct Lines<'a> {
    inner: std::str::Lines<'a>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Lines { inner: text.lines() }
    }

    fn next_tokens(&mut self) -> Option<Vec<&'a str>> {
        loop {
            let line = self.inner.next()?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            return Some(line.split_whitespace().collect());
        }
    }
}

fn parse_f32(tok: &str) -> Result<f32> {
    tok.parse().map_err(|_| crate::engine_err!(Codec, "md5: bad float token {:?}", tok))
}

fn parse_u32(tok: &str) -> Result<u32> {
    tok.parse().map_err(|_| crate::engine_err!(Codec, "md5: bad integer token {:?}", tok))
}

fn parse_i64(tok: &str) -> Result<i64> {
    tok.parse().map_err(|_| crate::engine_err!(Codec, "md5: bad integer token {:?}", tok))
}

fn expect_tag<'a>(tokens: &Option<Vec<&'a str>>, tag: &str) -> Result<()> {
    match tokens {
        Some(t) if t.first() == Some(&tag) => Ok(()),
        Some(t) => engine_bail!(Codec, "md5: expected {:?}, got {:?}", tag, t),
        None => engine_bail!(Codec, "md5: expected {:?}, got end of input", tag),
    }
}

/// Parses one `joints ... endjoints` block into a [`Skeleton`] built with
/// `n_slots` matrix slots. Each joint line is `<parent> <px> <py> <pz>
/// <qx> <qy> <qz>`, `parent == -1` marking the root.
fn parse_joints_block(lines: &mut Lines, n_slots: usize) -> Result<Skeleton> {
    expect_tag(&lines.next_tokens(), "joints")?;
    let mut joints = Vec::new();
    loop {
        let tokens = lines.next_tokens();
        if tokens.as_ref().and_then(|t| t.first()).copied() == Some("endjoints") {
            break;
        }
        let Some(tokens) = tokens else { engine_bail!(Codec, "md5: unterminated joints block") };
        if tokens.len() != 7 {
            engine_bail!(Codec, "md5: joint record needs 7 fields, got {}", tokens.len());
        }
        let parent_raw = parse_i64(tokens[0])?;
        let parent = if parent_raw < 0 { None } else { Some(parent_raw as u32) };
        let position = Vec3::new(parse_f32(tokens[1])?, parse_f32(tokens[2])?, parse_f32(tokens[3])?);
        let orientation = Quaternion::compute_w(parse_f32(tokens[4])?, parse_f32(tokens[5])?, parse_f32(tokens[6])?);
        joints.push(Joint::new(parent, position, orientation));
    }
    Ok(Skeleton::new(joints, n_slots))
}

/// Parses a minimal `.md5mesh`-like block structure:
/// `joints ... endjoints`, `verts ... endverts`, `weights ... endweights`,
/// `tris ... endtris`.
pub fn read_mesh(text: &str) -> Result<Md5Mesh> {
    let mut lines = Lines::new(text);
    let base_skeleton = parse_joints_block(&mut lines, 1)?;

    expect_tag(&lines.next_tokens(), "verts")?;
    let mut vertex_weights = Vec::new();
    loop {
        let tokens = lines.next_tokens();
        if tokens.as_ref().and_then(|t| t.first()).copied() == Some("endverts") {
            break;
        }
        let Some(tokens) = tokens else { engine_bail!(Codec, "md5: unterminated verts block") };
        if tokens.len() != 2 {
            engine_bail!(Codec, "md5: vertex record needs 2 fields, got {}", tokens.len());
        }
        vertex_weights.push(Md5VertexWeights {
            first_weight: parse_u32(tokens[0])?,
            weight_count: parse_u32(tokens[1])?,
        });
    }

    expect_tag(&lines.next_tokens(), "weights")?;
    let mut weights = Vec::new();
    loop {
        let tokens = lines.next_tokens();
        if tokens.as_ref().and_then(|t| t.first()).copied() == Some("endweights") {
            break;
        }
        let Some(tokens) = tokens else { engine_bail!(Codec, "md5: unterminated weights block") };
        if tokens.len() != 5 {
            engine_bail!(Codec, "md5: weight record needs 5 fields, got {}", tokens.len());
        }
        weights.push(Md5Weight {
            joint: parse_u32(tokens[0])?,
            weight: parse_f32(tokens[1])?,
            position: Vec3::new(parse_f32(tokens[2])?, parse_f32(tokens[3])?, parse_f32(tokens[4])?),
        });
    }

    expect_tag(&lines.next_tokens(), "tris")?;
    let mut indices = Vec::new();
    loop {
        let tokens = lines.next_tokens();
        if tokens.as_ref().and_then(|t| t.first()).copied() == Some("endtris") {
            break;
        }
        let Some(tokens) = tokens else { engine_bail!(Codec, "md5: unterminated tris block") };
        if tokens.len() != 3 {
            engine_bail!(Codec, "md5: triangle record needs 3 fields, got {}", tokens.len());
        }
        for tok in tokens {
            indices.push(parse_u32(tok)?);
        }
    }

    Ok(Md5Mesh { base_skeleton, vertex_weights, weights, indices })
}

/// Parses a minimal `.md5anim`-like block structure: `framerate <f>`
/// followed by one or more `key ... endkey` blocks, each holding a full
/// joint-topology snapshot for that frame.
pub fn read_anim(text: &str) -> Result<Md5Anim> {
    let mut lines = Lines::new(text);
    let rate_tokens = lines.next_tokens();
    let Some(rate_tokens) = rate_tokens else { engine_bail!(Codec, "md5: empty animation") };
    if rate_tokens.first() != Some(&"framerate") || rate_tokens.len() != 2 {
        engine_bail!(Codec, "md5: expected 'framerate <hz>', got {:?}", rate_tokens);
    }
    let frame_rate = parse_f32(rate_tokens[1])?;

    let mut keys = Vec::new();
    loop {
        let tokens = lines.next_tokens();
        let Some(tokens) = tokens else { break };
        if tokens.first() != Some(&"key") {
            engine_bail!(Codec, "md5: expected 'key', got {:?}", tokens);
        }
        let mut joints = Vec::new();
        loop {
            let tokens = lines.next_tokens();
            if tokens.as_ref().and_then(|t| t.first()).copied() == Some("endkey") {
                break;
            }
            let Some(tokens) = tokens else { engine_bail!(Codec, "md5: unterminated key block") };
            if tokens.len() != 7 {
                engine_bail!(Codec, "md5: joint record needs 7 fields, got {}", tokens.len());
            }
            let parent_raw = parse_i64(tokens[0])?;
            let parent = if parent_raw < 0 { None } else { Some(parent_raw as u32) };
            let position = Vec3::new(parse_f32(tokens[1])?, parse_f32(tokens[2])?, parse_f32(tokens[3])?);
            let orientation = Quaternion::compute_w(parse_f32(tokens[4])?, parse_f32(tokens[5])?, parse_f32(tokens[6])?);
            joints.push(Joint::new(parent, position, orientation));
        }
        keys.push(KeySkeleton::new(joints));
    }

    if keys.is_empty() {
        engine_bail!(Codec, "md5: animation has no keyframes");
    }

    Ok(Md5Anim { keys, frame_rate })
}

#[cfg(test)]
#[path = "md5_tests.rs"]
mod tests;
