use super::*;

#[test]
fn default_group_is_read_write_double_buffer() {
    let g = NodeGroup::default();
    assert_eq!(g.read_slot(), 0);
    assert_eq!(g.write_slot(), 1);
}

#[test]
fn switch_rotates_indirection_without_moving_data() {
    let mut g = NodeGroup::default();
    g.switch(0, 1);
    assert_eq!(g.read_slot(), 1);
    assert_eq!(g.write_slot(), 0);
    g.switch(0, 1);
    assert_eq!(g.read_slot(), 0);
    assert_eq!(g.write_slot(), 1);
}
