use super::array::GeometryArray;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::device::{AttributeKind, PrimitiveType, ScalarType};
use crate::math::{Vec2, Vec3};
use crate::vertex::{ArraySource, IndexArray, VertexArray};
use std::sync::Arc;

/// Owns a set of interleavable [`GeometryArray`]s plus an optional index
/// array, cached accessors for the common position/normal/texcoord case,
/// and lazily-recomputed bounding volumes.
pub struct Geometry {
    primitive: PrimitiveType,
    arrays: Vec<GeometryArray>,
    modified: Vec<usize>,
    index_array: Option<IndexArray>,
    position_idx: Option<usize>,
    normal_idx: Option<usize>,
    texcoord_idx: Option<usize>,
    vertex_count: u32,
    index_count: u32,
    positions: Vec<Vec3>,
    bounding_box: BoundingBox,
    bounding_sphere: BoundingSphere,
    bounds_dirty: bool,
}

impl Geometry {
    pub fn new(primitive: PrimitiveType) -> Self {
        Geometry {
            primitive,
            arrays: Vec::new(),
            modified: Vec::new(),
            index_array: None,
            position_idx: None,
            normal_idx: None,
            texcoord_idx: None,
            vertex_count: 0,
            index_count: 0,
            positions: Vec::new(),
            bounding_box: BoundingBox::new(),
            bounding_sphere: BoundingSphere::default(),
            bounds_dirty: true,
        }
    }

    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn index_array(&self) -> Option<&IndexArray> {
        self.index_array.as_ref()
    }

    pub fn array(&self, idx: usize) -> Option<&GeometryArray> {
        self.arrays.get(idx)
    }

    pub fn array_mut(&mut self, idx: usize) -> Option<&mut GeometryArray> {
        self.arrays.get_mut(idx)
    }

    pub fn arrays(&self) -> &[GeometryArray] {
        &self.arrays
    }

    pub fn add_array(&mut self, array: VertexArray) -> usize {
        self.arrays.push(GeometryArray::new(array));
        self.arrays.len() - 1
    }

    /// Links `child` into `root`'s interleave chain, appending it after the
    /// chain's current tail.
    pub fn attach(&mut self, child: usize, root: usize) {
        let mut tail = root;
        while let Some(next) = self.arrays[tail].child() {
            tail = next;
        }
        self.arrays[tail].set_child(Some(child));
        self.arrays[child].set_root(Some(root));
    }

    /// `Geometry_Modified`: moves `idx` from the arrays list to the
    /// modified list, unioning `range` (vertex indices) into its dirty
    /// range.
    pub fn mark_modified(&mut self, idx: usize, range: Option<(u32, u32)>) {
        if let Some(array) = self.arrays.get_mut(idx) {
            array.mark_modified(range);
            if !self.modified.contains(&idx) {
                self.modified.push(idx);
            }
        }
    }

    /// `Geometry_Update`: drains the modified list, invoking every user of
    /// each modified array and returning it to the normal list.
    pub fn update(&mut self) {
        for idx in std::mem::take(&mut self.modified) {
            if let Some(array) = self.arrays.get_mut(idx) {
                array.update();
            }
        }
    }

    pub fn position_array(&self) -> Option<&GeometryArray> {
        self.position_idx.and_then(|i| self.arrays.get(i))
    }

    pub fn normal_array(&self) -> Option<&GeometryArray> {
        self.normal_idx.and_then(|i| self.arrays.get(i))
    }

    pub fn texcoord_array(&self) -> Option<&GeometryArray> {
        self.texcoord_idx.and_then(|i| self.arrays.get(i))
    }

    /// `SetData`: replaces the arrays with immediate-mode position/normal/
    /// texcoord/index streams and records the cached accessor indices. The
    /// common case for CPU-authored geometry; buffer-backed arrays are
    /// added directly via [`Geometry::add_array`].
    pub fn set_data(
        &mut self,
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        texcoords: Option<Vec<Vec2>>,
        indices: Option<Vec<u32>>,
        nverts: u32,
        nindices: u32,
    ) {
        self.arrays.clear();
        self.modified.clear();

        let pos_bytes: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<Vec3, u8>(&positions));
        let pos_array = VertexArray::new_immediate(AttributeKind::Position, ScalarType::F32, 3, 12, pos_bytes);
        self.position_idx = Some(self.add_array(pos_array));
        self.positions = positions;

        self.normal_idx = normals.map(|n| {
            let bytes: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<Vec3, u8>(&n));
            let array = VertexArray::new_immediate(AttributeKind::Normal, ScalarType::F32, 3, 12, bytes);
            self.add_array(array)
        });

        self.texcoord_idx = texcoords.map(|t| {
            let bytes: Arc<[u8]> = Arc::from(bytemuck::cast_slice::<Vec2, u8>(&t));
            let array = VertexArray::new_immediate(AttributeKind::TexCoord(0), ScalarType::F32, 2, 8, bytes);
            self.add_array(array)
        });

        self.index_array = indices.map(|ix| IndexArray {
            index_type: crate::device::IndexType::U32,
            source: ArraySource::Immediate(Arc::from(bytemuck::cast_slice::<u32, u8>(&ix))),
            count: nindices,
        });

        self.vertex_count = nverts;
        self.index_count = nindices;
        self.bounds_dirty = true;
    }

    pub fn mark_bounds_dirty(&mut self) {
        self.bounds_dirty = true;
    }

    fn recompute_bounds_if_dirty(&mut self) {
        if !self.bounds_dirty {
            return;
        }
        self.bounding_box = BoundingBox::from_points(&self.positions);
        self.bounding_sphere = BoundingSphere::from_points(&self.positions);
        self.bounds_dirty = false;
    }

    /// `GenerateBoundingBox`.
    pub fn bounding_box(&mut self) -> &BoundingBox {
        self.recompute_bounds_if_dirty();
        &self.bounding_box
    }

    /// `GenerateBoundingSphere`.
    pub fn bounding_sphere(&mut self) -> &BoundingSphere {
        self.recompute_bounds_if_dirty();
        &self.bounding_sphere
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
