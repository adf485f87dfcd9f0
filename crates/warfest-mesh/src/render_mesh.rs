//! Render and collision meshes populated from a finished [`MeshData`].

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::mesh_data::MeshData;

/// Interleaved vertex layout for GPU upload.
///
/// | Offset | Field    | Type       |
/// |--------|----------|------------|
/// | 0      | position | `[f32; 3]` |
/// | 12     | normal   | `[f32; 3]` |
/// | 24     | uv       | `[f32; 2]` |
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);

/// Per-vertex normals from triangle geometry.
///
/// Each triangle adds its unnormalized face normal (twice its area) to its
/// three vertices; the sums are normalized at the end. Vertices touched by
/// no triangle, or only by degenerate ones, get a zero normal.
pub fn recalculate_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Mesh drawn for a chunk: positions, recalculated normals, atlas UVs and
/// a triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and UVs for upload.
    pub fn vertices(&self) -> Vec<MeshVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| MeshVertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    pub fn indices_u32(&self) -> &[u32] {
        &self.indices
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl From<&MeshData> for RenderMesh {
    fn from(data: &MeshData) -> Self {
        Self {
            positions: data.vertices.clone(),
            normals: recalculate_normals(&data.vertices, &data.triangles),
            uvs: data.uv.clone(),
            indices: data.triangles.clone(),
        }
    }
}

/// Physics shape for a chunk. Same triangles as the render mesh, no UVs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl CollisionMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl From<&MeshData> for CollisionMesh {
    fn from(data: &MeshData) -> Self {
        Self {
            positions: data.vertices.clone(),
            indices: data.triangles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use warfest_voxel::{Chunk, Color, Direction, Voxel};

    use super::*;
    use crate::build::build_mesh;

    fn cube_mesh() -> MeshData {
        let chunk = Chunk::filled(3, 2, 4, Voxel::solid(Color::GREEN)).unwrap();
        let atlas = HashMap::from([(Color::GREEN, Vec2::new(0.5, 0.5))]);
        build_mesh(&chunk, &atlas).unwrap()
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(std::mem::offset_of!(MeshVertex, normal), 12);
        assert_eq!(std::mem::offset_of!(MeshVertex, uv), 24);
    }

    #[test]
    fn test_render_and_collision_share_geometry() {
        let data = cube_mesh();
        let render = RenderMesh::from(&data);
        let collision = CollisionMesh::from(&data);

        assert_eq!(render.positions, collision.positions);
        assert_eq!(render.indices, collision.indices);
        assert_eq!(render.uvs, data.uv);
        assert_eq!(render.triangle_count(), collision.triangle_count());
    }

    #[test]
    fn test_normals_point_along_face_directions() {
        let data = cube_mesh();
        let render = RenderMesh::from(&data);

        // One quad per direction, in `Direction::ALL` order.
        for (quad, dir) in Direction::ALL.into_iter().enumerate() {
            let n = dir.normal();
            let expected = Vec3::new(n[0] as f32, n[1] as f32, n[2] as f32);
            for normal in &render.normals[quad * 4..quad * 4 + 4] {
                assert!((*normal - expected).length() < 1e-5, "{dir:?}: {normal}");
            }
        }
    }

    #[test]
    fn test_interleaved_vertices() {
        let data = cube_mesh();
        let render = RenderMesh::from(&data);
        let vertices = render.vertices();

        assert_eq!(vertices.len(), render.vertex_count());
        assert_eq!(vertices[0].position, data.vertices[0].to_array());
        assert_eq!(vertices[0].uv, [0.5, 0.5]);
        assert_eq!(bytemuck::cast_slice::<MeshVertex, u8>(&vertices).len(), vertices.len() * 32);
        assert_eq!(render.index_bytes().len(), render.indices_u32().len() * 4);
    }

    #[test]
    fn test_unreferenced_vertex_gets_zero_normal() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let normals = recalculate_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals[3], Vec3::ZERO);
        assert!((normals[0] - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_empty_collision_mesh() {
        let collision = CollisionMesh::from(&MeshData::new());
        assert!(collision.is_empty());
    }
}
