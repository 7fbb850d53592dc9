use super::*;
use crate::device::PrimitiveType;
use crate::geometry::Geometry;
use glam::Vec3;

fn make_buffer(max: u32) -> ParticleBuffer {
    ParticleBuffer::new(
        max,
        4, // payload: one f32 "seed"
        4, // vertex: one f32
        1,
        Box::new(|header: &mut ParticleHeader, payload: &mut [u8]| {
            header.position = Vec3::ZERO;
            header.age = 1.0;
            payload.copy_from_slice(&1.0f32.to_le_bytes());
        }),
        Box::new(|vertex: &mut [u8], header: &ParticleHeader| {
            vertex.copy_from_slice(&header.position.x.to_le_bytes());
        }),
        Box::new(|header: &mut ParticleHeader, _payload: &mut [u8], dt: f32| {
            header.age -= dt;
            header.position.x += 1.0;
        }),
        Box::new(|vertex: &mut [u8], header: &ParticleHeader| {
            vertex.copy_from_slice(&header.position.x.to_le_bytes());
        }),
    )
}

#[test]
fn add_particles_clamps_to_remaining_capacity() {
    let mut pb = make_buffer(4);
    let first = pb.add_particles(2);
    assert_eq!(first, 0);
    assert_eq!(pb.n_particles(), 2);
    let first2 = pb.add_particles(10);
    assert_eq!(first2, 2);
    assert_eq!(pb.n_particles(), 4);
    assert_eq!(pb.add_particles(1), 4);
    assert_eq!(pb.n_particles(), 4);
}

#[test]
fn remove_particle_swaps_last_active_into_freed_slot() {
    let mut pb = make_buffer(4);
    pb.add_particles(4);
    for i in 0..4 {
        pb.update_particles(0.0);
        let _ = i;
    }
    // Give particle 3 a distinguishable position, then remove slot 1.
    pb.update_particles(1.0); // every particle's position.x += 1.0
    let last_pos = pb.header(3).position;
    pb.remove_particle(1);
    assert_eq!(pb.n_particles(), 3);
    assert_eq!(pb.header(1).position, last_pos);
}

#[test]
fn update_particles_tracks_aabb_when_enabled() {
    let mut pb = make_buffer(3);
    pb.add_particles(3);
    pb.set_update_aabb(true);
    pb.update_particles(0.5);
    assert!(pb.aabb().is_some());
}

#[test]
fn update_arrays_marks_bound_geometry_array_modified() {
    let mut pb = make_buffer(2);
    pb.add_particles(2);
    let mut geom = Geometry::new(PrimitiveType::Points);
    let idx = geom.add_array(crate::vertex::VertexArray::new_immediate(
        crate::device::AttributeKind::Generic(0),
        crate::device::ScalarType::F32,
        1,
        4,
        std::sync::Arc::from(vec![0u8; 8]),
    ));
    pb.bind_geometry_array(idx);
    pb.update_arrays(&mut geom);
    assert!(geom.array(idx).unwrap().is_modified());
}

#[test]
fn remove_dead_compacts_low_age_particles() {
    let mut pb = make_buffer(4);
    pb.add_particles(4);
    pb.update_particles(10.0); // age = 1.0 - 10.0 = -9.0, below any positive threshold
    pb.remove_dead(0.0);
    assert_eq!(pb.n_particles(), 0);
}
