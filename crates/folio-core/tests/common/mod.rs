#![allow(dead_code)]

use folio_core::{MeshData, SceneHost, Vertex};
use glam::{Vec2, Vec3};

/// Small cube (edge `size`) centered at `center`, as a single primitive.
pub fn cube(center: Vec3, size: f32) -> MeshData {
    cuboid(center, Vec3::splat(size))
}

/// Axis-aligned box with edge lengths `size`, centered at `center`.
pub fn cuboid(center: Vec3, size: Vec3) -> MeshData {
    let h = size * 0.5;
    let corners: Vec<Vertex> = (0..8)
        .map(|i| Vertex {
            position: [
                center.x + if i & 1 == 0 { -h.x } else { h.x },
                center.y + if i & 2 == 0 { -h.y } else { h.y },
                center.z + if i & 4 == 0 { -h.z } else { h.z },
            ],
            normal: [0.0, 1.0, 0.0],
        })
        .collect();
    let indices = [
        0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6, 4,
        1, 5, 7, 1, 7, 3,
    ];
    let mut mesh = MeshData::default();
    mesh.push_primitive(&corners, &indices, [0.2, 0.6, 0.3, 1.0]);
    mesh
}

/// Settle every pending load in `scene` with a small cube.
pub fn load_all_with_cubes(scene: &mut SceneHost) {
    for (id, _) in scene.pending_loads() {
        scene
            .finish_load(id, Ok(cube(Vec3::new(1.0, 2.0, 3.0), 0.05)))
            .unwrap();
    }
}

/// NDC of a world point as seen by the scene's camera.
pub fn ndc_of(scene: &SceneHost, world: Vec3) -> Vec2 {
    let clip = scene.camera().view_proj() * world.extend(1.0);
    Vec2::new(clip.x / clip.w, clip.y / clip.w)
}

/// Minimal binary glTF: one node (translated by `translation`) with one
/// indexed triangle and no normals.
pub fn triangle_glb(translation: [f32; 3]) -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    let bin_len = bin.len();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let json = format!(
        concat!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
            r#""nodes":[{{"mesh":0,"translation":[{},{},{}]}}],"#,
            r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],"#,
            r#""buffers":[{{"byteLength":{}}}],"#,
            r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},{{"buffer":0,"byteOffset":36,"byteLength":6}}],"#,
            r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
            r#"{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}]}}"#
        ),
        translation[0], translation[1], translation[2], bin_len
    );
    let mut json = json.into_bytes();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }

    let total = 12 + 8 + json.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(b"BIN\0");
    out.extend_from_slice(&bin);
    out
}
