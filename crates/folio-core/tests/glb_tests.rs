mod common;

use folio_core::{decode_glb, FolioError, NormalizedModel, DEFAULT_BASE_COLOR};
use glam::Vec3;

#[test]
fn decodes_single_triangle() {
    let bytes = common::triangle_glb([0.0, 0.0, 0.0]);
    let mesh = decode_glb("/tri.glb", &bytes).unwrap();

    assert_eq!(mesh.vertices.len(), 3);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.primitives.len(), 1);
    assert_eq!(mesh.primitives[0].base_color, DEFAULT_BASE_COLOR);
    // normals were missing and get computed: triangle lies in the XY plane
    let n = Vec3::from(mesh.vertices[0].normal);
    assert!((n.z.abs() - 1.0).abs() < 1e-5);
}

#[test]
fn node_translation_is_baked_in() {
    let bytes = common::triangle_glb([10.0, 0.0, -2.0]);
    let mesh = decode_glb("/tri.glb", &bytes).unwrap();
    assert_eq!(mesh.vertices[1].position, [11.0, 0.0, -2.0]);

    // centering removes the translation again
    let model = NormalizedModel::new(mesh, Vec3::ZERO, 2.0).unwrap();
    let c = model
        .base
        .transform_point3(model.source_bounds.center());
    assert!(c.length() < 1e-5);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_glb("/broken.glb", b"not a glb").unwrap_err();
    assert!(matches!(err, FolioError::Decode { .. }));
    assert!(err.to_string().contains("/broken.glb"));
}
