//! Binary glTF decoding into a single flattened [`MeshData`].

use crate::constants::DEFAULT_BASE_COLOR;
use crate::error::{FolioError, Result};
use crate::mesh::{compute_vertex_normals, MeshData, Vertex};
use glam::{Mat3, Mat4, Vec3};

/// Decode a `.glb` payload. Node transforms of the default scene are baked
/// into the vertices so the result can be normalized as one rigid object.
pub fn decode_glb(path: &str, bytes: &[u8]) -> Result<MeshData> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|source| FolioError::Decode {
        path: path.to_string(),
        source,
    })?;
    let blob = gltf.blob.as_deref();
    let document = &gltf.document;
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| FolioError::EmptyAsset(path.to_string()))?;

    let mut mesh = MeshData::default();
    for node in scene.nodes() {
        visit_node(path, &node, Mat4::IDENTITY, blob, &mut mesh)?;
    }
    if mesh.is_empty() {
        return Err(FolioError::EmptyAsset(path.to_string()));
    }
    log::debug!(
        "[asset] {} decoded: {} vertices, {} triangles, {} primitives",
        path,
        mesh.vertices.len(),
        mesh.triangle_count(),
        mesh.primitives.len()
    );
    Ok(mesh)
}

fn visit_node(
    path: &str,
    node: &gltf::Node<'_>,
    parent: Mat4,
    blob: Option<&[u8]>,
    out: &mut MeshData,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        let normal_matrix = normal_matrix(world);
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "[asset] {}: skipping {:?} primitive in mesh {:?}",
                    path,
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => blob,
                gltf::buffer::Source::Uri(_) => None,
            });
            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .ok_or_else(|| FolioError::Unsupported {
                    path: path.to_string(),
                    reason: "primitive without readable POSITION data".to_string(),
                })?
                .collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(ix) => ix.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(n) => n.collect(),
                None => compute_vertex_normals(&positions, &indices),
            };
            let vertices: Vec<Vertex> = positions
                .iter()
                .zip(normals.iter())
                .map(|(p, n)| Vertex {
                    position: world.transform_point3(Vec3::from(*p)).to_array(),
                    normal: (normal_matrix * Vec3::from(*n))
                        .try_normalize()
                        .unwrap_or(Vec3::Y)
                        .to_array(),
                })
                .collect();
            let material = primitive.material();
            let base_color = match material.index() {
                Some(_) => material.pbr_metallic_roughness().base_color_factor(),
                None => DEFAULT_BASE_COLOR,
            };
            out.push_primitive(&vertices, &indices, base_color);
        }
    }
    for child in node.children() {
        visit_node(path, &child, world, blob, out)?;
    }
    Ok(())
}

fn normal_matrix(world: Mat4) -> Mat3 {
    let m = Mat3::from_mat4(world);
    if m.determinant().abs() > f32::EPSILON {
        m.inverse().transpose()
    } else {
        m
    }
}
