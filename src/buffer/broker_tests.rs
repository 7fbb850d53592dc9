use super::*;
use crate::device::{BufferTarget, BufferUsage, MockDevice};

fn new_broker() -> BufferBroker {
    BufferBroker::new(Box::new(MockDevice::new()))
}

#[test]
fn add_buffer_data_assigns_offset_and_grows_size() {
    let mut broker = new_broker();
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);

    let s1 = broker.add_buffer_new_data(b, vec![0u8; 12]).unwrap();
    let s2 = broker.add_buffer_new_data(b, vec![0u8; 24]).unwrap();

    assert_eq!(broker.segment(s1).unwrap().first(), Some(0));
    assert_eq!(broker.segment(s2).unwrap().first(), Some(12));
    assert_eq!(broker.buffer(b).unwrap().size(), 36);
}

#[test]
fn double_insertion_is_a_precondition_error() {
    let mut broker = new_broker();
    let b1 = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let b2 = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let s = broker.add_buffer_new_data(b1, vec![0u8; 4]).unwrap();

    let err = broker.add_buffer_data(b2, s).unwrap_err();
    assert!(matches!(err, crate::error::Error::Precondition(_)));
}

#[test]
fn remove_buffer_data_preserves_layout() {
    let mut broker = new_broker();
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let s1 = broker.add_buffer_new_data(b, vec![0u8; 12]).unwrap();
    let s2 = broker.add_buffer_new_data(b, vec![0u8; 12]).unwrap();

    broker.remove_buffer_data(s1).unwrap();

    assert_eq!(broker.buffer(b).unwrap().size(), 24, "size is not compacted");
    assert_eq!(broker.buffer(b).unwrap().segments(), &[s2]);
    assert!(broker.segment(s1).unwrap().owning_buffer().is_none());
}

/// A 12-byte-stride vertex buffer of 1000 vertices; mark
/// vertices [10,15) dirty and update — exactly 60 bytes at offset
/// `seg.first + 120` should be re-uploaded.
#[test]
fn partial_range_update_reuploads_only_the_dirty_bytes() {
    let mut broker = new_broker();
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let stride = 12u64;
    let seg = broker.add_buffer_new_data(b, vec![0u8; stride as usize * 1000]).unwrap();
    broker.build(b).unwrap();

    {
        let data = broker.segment_mut(seg).unwrap().data_mut().unwrap();
        for (i, byte) in data[120..180].iter_mut().enumerate() {
            *byte = (i + 1) as u8;
        }
    }
    broker
        .modified_buffer_data(seg, Some((10 * stride, 15 * stride)))
        .unwrap();

    assert_eq!(broker.buffer(b).unwrap().modified_range(), Some((120, 180)));

    broker.update_modified_buffers().unwrap();

    assert!(!broker.segment(seg).unwrap().is_modified());
    assert!(broker.buffer(b).unwrap().modified_range().is_none());

    let handle = broker.buffer(b).unwrap().handle().unwrap();
    let mock = broker.device_as::<MockDevice>().unwrap();
    let uploaded = mock.buffer_bytes(handle).unwrap();
    assert_eq!(&uploaded[120..180], &(1u8..=60).collect::<Vec<u8>>()[..]);
}

#[test]
fn update_modified_buffers_empties_the_registry() {
    let mut broker = new_broker();
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    let s = broker.add_buffer_new_data(b, vec![1u8; 16]).unwrap();
    broker.build(b).unwrap();

    broker.modified_buffer_data(s, None).unwrap();
    broker.update_modified_buffers().unwrap();

    assert!(broker.buffer(b).unwrap().modified_range().is_none());
    assert!(!broker.segment(s).unwrap().is_modified());
}

#[test]
fn build_uploads_every_segments_current_bytes() {
    let mut broker = new_broker();
    let b = broker.create_buffer(BufferTarget::Vertex, BufferUsage::StaticDraw);
    broker.add_buffer_new_data(b, vec![1, 2, 3]).unwrap();
    broker.add_buffer_new_data(b, vec![4, 5]).unwrap();
    broker.build(b).unwrap();

    let handle = broker.buffer(b).unwrap().handle().unwrap();
    let mock = broker.device_as::<MockDevice>().unwrap();
    assert_eq!(mock.buffer_bytes(handle).unwrap(), &[1, 2, 3, 4, 5]);
}
