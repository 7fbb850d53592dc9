use super::*;

const MESH: &str = "
joints
-1 0.0 0.0 0.0 0.0 0.0 0.0
0  0.0 1.0 0.0 0.0 0.0 0.0
endjoints
verts
0 2
2 1
endverts
weights
0 0.5 0.0 0.0 0.0
1 0.5 0.0 1.0 0.0
2 1.0 0.0 1.0 0.0
endweights
tris
0 1 2
endtris
";

const ANIM: &str = "
framerate 24.0
key
-1 0.0 0.0 0.0 0.0 0.0 0.0
0  0.0 1.0 0.0 0.0 0.0 0.0
endkey
key
-1 0.0 0.1 0.0 0.0 0.0 0.0
0  0.0 1.1 0.0 0.0 0.0 0.0
endkey
";

#[test]
fn reads_base_skeleton_weights_and_triangles() {
    let mesh = read_mesh(MESH).unwrap();
    assert_eq!(mesh.base_skeleton.joint_count(), 2);
    assert_eq!(mesh.base_skeleton.joints()[0].parent, None);
    assert_eq!(mesh.base_skeleton.joints()[1].parent, Some(0));
    assert_eq!(mesh.vertex_weights.len(), 2);
    assert_eq!(mesh.vertex_weights[0], Md5VertexWeights { first_weight: 0, weight_count: 2 });
    assert_eq!(mesh.weights.len(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
}

#[test]
fn rejects_a_mesh_missing_its_joints_block() {
    let text = "verts\nendverts\n";
    assert!(read_mesh(text).is_err());
}

#[test]
fn reads_every_key_and_the_frame_rate() {
    let anim = read_anim(ANIM).unwrap();
    assert_eq!(anim.frame_rate, 24.0);
    assert_eq!(anim.keys.len(), 2);
    assert_eq!(anim.keys[0].joints.len(), 2);
    assert_eq!(anim.keys[1].joints[0].position.y, 0.1);
}

#[test]
fn rejects_an_animation_with_no_keys() {
    let text = "framerate 24.0\n";
    assert!(read_anim(text).is_err());
}
