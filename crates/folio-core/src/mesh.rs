//! CPU-side mesh data, bounding boxes and the one-time normalization applied
//! to every loaded asset.

use glam::{Mat4, Vec3};
use smallvec::SmallVec;
use std::ops::Range;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// A contiguous run of indices drawn with one base color.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub indices: Range<u32>,
    pub base_color: [f32; 4],
}

/// Flattened triangle mesh: every primitive shares one vertex/index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub primitives: SmallVec<[Primitive; 4]>,
}

impl MeshData {
    /// Append a primitive, rebasing its indices onto the shared vertex buffer.
    pub fn push_primitive(&mut self, vertices: &[Vertex], indices: &[u32], base_color: [f32; 4]) {
        let base_vertex = self.vertices.len() as u32;
        let start = self.indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|i| i + base_vertex));
        let end = self.indices.len() as u32;
        self.primitives.push(Primitive {
            indices: start..end,
            base_color,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.position)))
    }

    /// Flat square in the XY plane facing +Z, centered on the origin.
    pub fn plane(size: f32, base_color: [f32; 4]) -> Self {
        let h = size * 0.5;
        let n = [0.0, 0.0, 1.0];
        let vertices = [
            Vertex { position: [-h, -h, 0.0], normal: n },
            Vertex { position: [h, -h, 0.0], normal: n },
            Vertex { position: [h, h, 0.0], normal: n },
            Vertex { position: [-h, h, 0.0], normal: n },
        ];
        let mut mesh = Self::default();
        mesh.push_primitive(&vertices, &[0, 1, 2, 0, 2, 3], base_color);
        mesh
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere through the box corners.
    pub fn bounding_radius(&self) -> f32 {
        self.size().length() * 0.5
    }
}

/// A decoded mesh plus the base transform that centers and scales it.
#[derive(Clone, Debug)]
pub struct NormalizedModel {
    pub mesh: MeshData,
    /// `T(offset) * S(scale) * T(-center)`; computed once per load.
    pub base: Mat4,
    /// Bounds of the source mesh before normalization.
    pub source_bounds: Aabb,
    pub scale: f32,
    pub offset: Vec3,
}

impl NormalizedModel {
    /// Center the mesh's bounding box on the origin, then apply `offset` and a
    /// uniform `scale`. Returns `None` for a mesh without vertices.
    pub fn new(mesh: MeshData, offset: Vec3, scale: f32) -> Option<Self> {
        let source_bounds = mesh.bounds()?;
        let base = Mat4::from_translation(offset)
            * Mat4::from_scale(Vec3::splat(scale))
            * Mat4::from_translation(-source_bounds.center());
        Some(Self {
            mesh,
            base,
            source_bounds,
            scale,
            offset,
        })
    }

    /// Bounding sphere in the rotating group's local space.
    pub fn local_bounding_sphere(&self) -> (Vec3, f32) {
        (self.offset, self.source_bounds.bounding_radius() * self.scale)
    }
}

/// Compute smooth per-vertex normals by averaging adjacent face normals.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let v0 = Vec3::from(positions[i0]);
        let v1 = Vec3::from(positions[i1]);
        let v2 = Vec3::from(positions[i2]);
        let face = (v1 - v0).cross(v2 - v0);
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(min: Vec3, max: Vec3) -> MeshData {
        let corners: Vec<Vertex> = (0..8)
            .map(|i| Vertex {
                position: [
                    if i & 1 == 0 { min.x } else { max.x },
                    if i & 2 == 0 { min.y } else { max.y },
                    if i & 4 == 0 { min.z } else { max.z },
                ],
                normal: [0.0, 1.0, 0.0],
            })
            .collect();
        let mut mesh = MeshData::default();
        mesh.push_primitive(&corners, &[0, 1, 2, 4, 5, 6], [1.0; 4]);
        mesh
    }

    #[test]
    fn normalization_centers_bounds_on_offset() {
        let mesh = cube(Vec3::new(2.0, 2.0, 2.0), Vec3::new(4.0, 6.0, 3.0));
        let offset = Vec3::new(0.5, -1.0, 0.0);
        let model = NormalizedModel::new(mesh, offset, 3.0).unwrap();
        let transformed = Aabb::from_points(
            model
                .mesh
                .vertices
                .iter()
                .map(|v| model.base.transform_point3(Vec3::from(v.position))),
        )
        .unwrap();
        assert!((transformed.center() - offset).length() < 1e-5);
        assert!((transformed.size() - Vec3::new(6.0, 12.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn empty_mesh_cannot_be_normalized() {
        assert!(NormalizedModel::new(MeshData::default(), Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn push_primitive_rebases_indices() {
        let mut mesh = cube(Vec3::ZERO, Vec3::ONE);
        let extra = [Vertex::default(); 3];
        mesh.push_primitive(&extra, &[0, 1, 2], [0.5; 4]);
        assert_eq!(mesh.primitives.len(), 2);
        assert_eq!(mesh.primitives[1].indices, 6..9);
        assert_eq!(&mesh.indices[6..], &[8, 9, 10]);
    }

    #[test]
    fn computed_normals_face_out_of_a_ccw_triangle() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        for n in normals {
            assert!((Vec3::from(n) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn plane_is_two_triangles_of_requested_size() {
        let plane = MeshData::plane(10.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(plane.triangle_count(), 2);
        assert_eq!(plane.bounds().unwrap().size(), Vec3::new(10.0, 10.0, 0.0));
    }
}
