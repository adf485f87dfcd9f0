//! Greedy voxel-face meshing: culls hidden faces, merges same-colored visible
//! faces into maximal rectangles, and assembles render and collision meshes.

pub mod assembler;
pub mod build;
pub mod error;
pub mod greedy;
pub mod mesh_data;
pub mod pipeline;
pub mod remap;
pub mod render_mesh;
pub mod scanner;
pub mod slot;
pub mod voxel_rect;

pub use assembler::{emit, quad_vertices};
pub use build::{build_direction, build_mesh, build_mesh_parallel};
pub use error::MeshError;
pub use greedy::{build_face, compatible_lines, grow_rect, line_size};
pub use mesh_data::MeshData;
pub use pipeline::{BuildStrategy, ChunkId, MeshingPipeline, MeshingResult, MeshingTask};
pub use remap::to_chunk_space;
pub use render_mesh::{CollisionMesh, MeshVertex, RenderMesh, recalculate_normals};
pub use scanner::{UsedPositions, is_face_visible, next_visible_unused_position};
pub use slot::{ChunkMeshState, InstallOutcome, MeshSlot};
pub use voxel_rect::VoxelRect;
