use super::*;
use crate::device::PrimitiveType;
use crate::math::Vec3;
use std::sync::{Arc, Mutex};

#[test]
fn set_data_populates_cached_accessors_and_counts() {
    let mut geom = Geometry::new(PrimitiveType::Triangles);
    let positions = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
    geom.set_data(positions, None, None, Some(vec![0, 1, 2]), 3, 3);

    assert!(geom.position_array().is_some());
    assert!(geom.normal_array().is_none());
    assert_eq!(geom.vertex_count(), 3);
    assert_eq!(geom.index_count(), 3);
    assert!(geom.index_array().is_some());
}

#[test]
fn bounding_volumes_recompute_only_while_dirty() {
    let mut geom = Geometry::new(PrimitiveType::Triangles);
    let positions = vec![Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)];
    geom.set_data(positions, None, None, None, 2, 0);

    let box1 = *geom.bounding_box();
    assert_eq!(box1.width(), 2.0);
    let sphere1 = *geom.bounding_sphere();
    assert!(sphere1.radius > 0.0);

    // Calling again without marking dirty returns the identical cached volume.
    let box2 = *geom.bounding_box();
    assert_eq!(box1, box2);
}

#[test]
fn attach_chains_arrays_through_the_root() {
    use crate::device::{AttributeKind, ScalarType};
    use crate::vertex::VertexArray;

    let mut geom = Geometry::new(PrimitiveType::Triangles);
    let root = geom.add_array(VertexArray::new_immediate(
        AttributeKind::Position,
        ScalarType::F32,
        3,
        24,
        Arc::from([0u8; 24]),
    ));
    let child = geom.add_array(VertexArray::new_immediate(
        AttributeKind::Normal,
        ScalarType::F32,
        3,
        24,
        Arc::from([0u8; 24]),
    ));
    geom.attach(child, root);

    assert_eq!(geom.array(root).unwrap().child(), Some(child));
    assert_eq!(geom.array(child).unwrap().root(), Some(root));
}

#[test]
fn modified_array_fires_its_user_on_update() {
    let mut geom = Geometry::new(PrimitiveType::Points);
    let positions = vec![Vec3::ZERO];
    geom.set_data(positions, None, None, None, 1, 0);
    let idx = 0; // position array, first pushed

    let fired = Arc::new(Mutex::new(false));
    let fired_clone = Arc::clone(&fired);
    geom.array_mut(idx).unwrap().add_user(Box::new(move |_a, _r| {
        *fired_clone.lock().unwrap() = true;
    }));

    geom.mark_modified(idx, Some((0, 1)));
    geom.update();

    assert!(*fired.lock().unwrap());
}
