use crate::bounds::BoundingBox;
use crate::geometry::Geometry;
use glam::Vec3;

/// The fixed header every particle record carries ahead of its user payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleHeader {
    pub position: Vec3,
    pub velocity: Vec3,
    pub age: f32,
}

impl ParticleHeader {
    pub const ZERO: ParticleHeader = ParticleHeader { position: Vec3::ZERO, velocity: Vec3::ZERO, age: 0.0 };
}

type ParticleInit = Box<dyn FnMut(&mut ParticleHeader, &mut [u8]) + Send>;
type VertexInit = Box<dyn FnMut(&mut [u8], &ParticleHeader) + Send>;
type ParticleUpdate = Box<dyn FnMut(&mut ParticleHeader, &mut [u8], f32) + Send>;
type VertexUpdate = Box<dyn FnMut(&mut [u8], &ParticleHeader) + Send>;

/// A heterogeneous CPU particle array: a header (position/velocity/age) plus
/// a fixed-size user payload per particle, a parallel vertex mirror
/// (`vpp` vertices of `v_stride` bytes each), and the client callbacks that
/// spawn, update, and render them.
///
/// Active particles always occupy the contiguous prefix `[0, active)` of
/// every backing array — [`ParticleBuffer::remove_particle`] swaps the last
/// active entry into a freed slot to preserve that invariant, so the vertex
/// mirror stays a contiguous view suitable for a single geometry array.
pub struct ParticleBuffer {
    max: u32,
    payload_size: usize,
    v_stride: usize,
    vpp: u32,
    active: u32,
    headers: Vec<ParticleHeader>,
    payloads: Vec<u8>,
    vertices: Vec<u8>,
    geometry_array: Option<usize>,
    update_aabb: bool,
    aabb: Option<BoundingBox>,
    init: ParticleInit,
    init_array: VertexInit,
    update: ParticleUpdate,
    update_array: VertexUpdate,
}

impl ParticleBuffer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        max: u32,
        payload_size: usize,
        v_stride: usize,
        vpp: u32,
        init: ParticleInit,
        init_array: VertexInit,
        update: ParticleUpdate,
        update_array: VertexUpdate,
    ) -> Self {
        ParticleBuffer {
            max,
            payload_size,
            v_stride,
            vpp,
            active: 0,
            headers: vec![ParticleHeader::ZERO; max as usize],
            payloads: vec![0u8; max as usize * payload_size],
            vertices: vec![0u8; max as usize * vpp as usize * v_stride],
            geometry_array: None,
            update_aabb: false,
            aabb: None,
            init,
            init_array,
            update,
            update_array,
        }
    }

    pub fn bind_geometry_array(&mut self, idx: usize) {
        self.geometry_array = Some(idx);
    }

    pub fn set_update_aabb(&mut self, enabled: bool) {
        self.update_aabb = enabled;
        if !enabled {
            self.aabb = None;
        }
    }

    pub fn aabb(&self) -> Option<&BoundingBox> {
        self.aabb.as_ref()
    }

    pub fn n_particles(&self) -> u32 {
        self.active
    }

    pub fn max_particles(&self) -> u32 {
        self.max
    }

    pub fn header(&self, index: u32) -> &ParticleHeader {
        &self.headers[index as usize]
    }

    fn payload_chunk(&mut self, index: u32) -> &mut [u8] {
        let start = index as usize * self.payload_size;
        &mut self.payloads[start..start + self.payload_size]
    }

    fn vertex_chunk(&mut self, index: u32) -> &mut [u8] {
        let stride = self.vpp as usize * self.v_stride;
        let start = index as usize * stride;
        &mut self.vertices[start..start + stride]
    }

    /// `Particle_AddParticles`: clamps `n` to the remaining capacity, inits
    /// each new slot's header/payload/vertex data, and returns the offset of
    /// the first new particle.
    pub fn add_particles(&mut self, n: u32) -> u32 {
        let available = self.max - self.active;
        let n = n.min(available);
        let first = self.active;
        for i in first..first + n {
            let mut header = ParticleHeader::ZERO;
            {
                let payload = self.payload_chunk(i);
                (self.init)(&mut header, payload);
            }
            self.headers[i as usize] = header;
            let header = self.headers[i as usize];
            let vertex = self.vertex_chunk(i);
            (self.init_array)(vertex, &header);
        }
        self.active += n;
        first
    }

    /// `Particle_RemoveParticle`: swaps the last active particle into slot
    /// `k` (header, payload, and vertex data move in lock-step) so the
    /// active prefix stays contiguous.
    pub fn remove_particle(&mut self, k: u32) {
        if k >= self.active {
            return;
        }
        let last = self.active - 1;
        if k != last {
            self.headers.swap(k as usize, last as usize);

            let (plo, phi) = (k as usize * self.payload_size, last as usize * self.payload_size);
            for b in 0..self.payload_size {
                self.payloads.swap(plo + b, phi + b);
            }

            let vstride = self.vpp as usize * self.v_stride;
            let (vlo, vhi) = (k as usize * vstride, last as usize * vstride);
            for b in 0..vstride {
                self.vertices.swap(vlo + b, vhi + b);
            }
        }
        self.active = last;
    }

    /// `UpdateParticles`: advances every active particle by `dt` via the
    /// update callback; if [`ParticleBuffer::set_update_aabb`] is enabled,
    /// simultaneously tracks the min/max position bounds.
    pub fn update_particles(&mut self, dt: f32) {
        let active = self.active;
        let mut min = None;
        let mut max = None;
        for i in 0..active {
            let mut header = self.headers[i as usize];
            {
                let payload = self.payload_chunk(i);
                (self.update)(&mut header, payload, dt);
            }
            self.headers[i as usize] = header;

            if self.update_aabb {
                min = Some(min.map_or(header.position, |m: Vec3| m.min(header.position)));
                max = Some(max.map_or(header.position, |m: Vec3| m.max(header.position)));
            }
        }
        if self.update_aabb {
            self.aabb = match (min, max) {
                (Some(min), Some(max)) => Some(BoundingBox::from_origin(min, max.x - min.x, max.y - min.y, max.z - min.z)),
                _ => None,
            };
        }
    }

    /// `UpdateArrays`: refreshes every active particle's vertex payload via
    /// the vertex-update callback, then marks the bound geometry array
    /// modified so the next buffer update re-uploads it. Per the source's
    /// particle-array update (which marks the whole array, not a range),
    /// this always requests a full re-upload rather than a ranged one.
    pub fn update_arrays(&mut self, geometry: &mut Geometry) {
        let active = self.active;
        for i in 0..active {
            let header = self.headers[i as usize];
            let vertex = self.vertex_chunk(i);
            (self.update_array)(vertex, &header);
        }
        if let Some(idx) = self.geometry_array {
            geometry.mark_modified(idx, None);
        }
    }

    /// `RemoveDead`: removes every active particle whose age is below
    /// `age_threshold`.
    pub fn remove_dead(&mut self, age_threshold: f32) {
        let mut i = 0;
        while i < self.active {
            if self.headers[i as usize].age < age_threshold {
                self.remove_particle(i);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
