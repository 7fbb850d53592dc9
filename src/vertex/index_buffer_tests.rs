use super::*;
use crate::device::{BufferTarget, BufferUsage, MockDevice};

#[test]
fn to_index_array_resolves_absolute_offset() {
    let mut broker = BufferBroker::new(Box::new(MockDevice::new()));
    let b = broker.create_buffer(BufferTarget::Index, BufferUsage::StaticDraw);
    broker.add_buffer_new_data(b, vec![0u8; 20]).unwrap(); // padding segment
    let seg = broker.add_buffer_new_data(b, vec![0u8; 12]).unwrap();
    broker.build(b).unwrap();

    let ib = IndexBuffer::new(b, seg, IndexType::U16, 6);
    let ia = ib.to_index_array(&broker).unwrap();
    match ia.source {
        crate::vertex::array::ArraySource::Buffer { offset, .. } => assert_eq!(offset, 20),
        _ => panic!("expected buffer source"),
    }
    assert_eq!(ia.count, 6);
}
