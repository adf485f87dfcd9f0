//! Output buffers of a chunk meshing pass.

use glam::{Vec2, Vec3};

use crate::error::MeshError;

/// Vertex positions, triangle indices and atlas UVs for one chunk.
///
/// Every quad appends 4 vertices, 6 indices and 4 identical UVs. A finished
/// `MeshData` is handed off whole; rebuilding a chunk produces a fresh one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions in chunk-local coordinates.
    pub vertices: Vec<Vec3>,
    /// Triangle list, 3 indices per triangle.
    pub triangles: Vec<u32>,
    /// One atlas UV per vertex.
    pub uv: Vec<Vec2>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mesh with room for `quads` quads.
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            triangles: Vec::with_capacity(quads * 6),
            uv: Vec::with_capacity(quads * 4),
        }
    }

    /// Appends one flat-textured quad.
    ///
    /// The two triangles are `(n-4, n-3, n-2)` and `(n-4, n-2, n-1)` where
    /// `n` is the vertex count after the corners are pushed, so winding
    /// follows the corner order.
    pub fn push_quad(&mut self, corners: [Vec3; 4], uv: Vec2) {
        self.vertices.extend_from_slice(&corners);
        let n = self.vertices.len() as u32;
        self.triangles
            .extend_from_slice(&[n - 4, n - 3, n - 2, n - 4, n - 2, n - 1]);
        self.uv.extend_from_slice(&[uv; 4]);
    }

    /// Appends all quads of `other`, rebasing its indices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.triangles
            .extend(other.triangles.into_iter().map(|i| i + base));
        self.uv.extend(other.uv);
    }

    /// Number of quads, i.e. merged rectangles.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Checks the buffer invariants: one UV per vertex, whole triangles, and
    /// every index pointing at an existing vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        if self.uv.len() != self.vertices.len() {
            return Err(MeshError::Corrupt(format!(
                "{} uvs for {} vertices",
                self.uv.len(),
                self.vertices.len()
            )));
        }
        if self.triangles.len() % 3 != 0 {
            return Err(MeshError::Corrupt(format!(
                "{} indices is not a whole number of triangles",
                self.triangles.len()
            )));
        }
        if let Some(&bad) = self
            .triangles
            .iter()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MeshError::Corrupt(format!(
                "index {bad} out of range for {} vertices",
                self.vertices.len()
            )));
        }
        Ok(())
    }
}
