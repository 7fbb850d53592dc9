use super::*;
use crate::buffer::BufferBroker;
use crate::device::{AttributeKind, BufferTarget, BufferUsage, MockDevice, ScalarType};
use crate::vertex::array::VertexArray;

fn setup_buffer(mode: RenderMode) -> (BufferBroker, VertexBuffer) {
    let mut broker = BufferBroker::new(Box::new(MockDevice::new()));
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let seg = broker.add_buffer_new_data(b, vec![0u8; 36]).unwrap();
    broker.build(b).unwrap();

    let va = VertexArray::new_buffer(AttributeKind::Position, ScalarType::F32, 3, 12, seg, 0);
    let mut vb = VertexBuffer::new(b, mode);
    vb.add_data(VertexBufferData::new(seg, vec![va]));
    (broker, vb)
}

#[test]
fn immediate_arrays_mode_returns_a_finishable_pipeline() {
    let (mut broker, mut vb) = setup_buffer(RenderMode::ImmediateArrays);
    let mut pipeline = vb.setup_for_render(&mut broker).unwrap().unwrap();
    pipeline.finish_vertex_array_render(broker.device_mut());
}

#[test]
fn vao_per_segment_mode_records_once_and_replays() {
    let (mut broker, mut vb) = setup_buffer(RenderMode::VaoPerSegment);
    let result = vb.setup_for_render(&mut broker).unwrap();
    assert!(result.is_none());
    assert!(vb.datas[0].vao.is_some());
    let first_vao = vb.datas[0].vao;

    vb.setup_for_render(&mut broker).unwrap();
    assert_eq!(vb.datas[0].vao, first_vao, "second call replays the same VAO");
}
